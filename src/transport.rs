use embassy_net::{
    dns::{DnsQueryType, Error as DNSError},
    tcp::{ConnectError, Error as TcpError, TcpSocket},
    Stack,
};
use embassy_time::Duration;
use embedded_io_async::{ErrorType, Read, ReadReady, Write};

use esp32_tank_sensor::constants::{RX_BUFFER_SIZE, TX_BUFFER_SIZE};
use esp32_tank_sensor::upload::{Connection, Connector};

/// Socket inactivity timeout, in seconds
const SOCKET_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub enum Error {
    #[allow(dead_code)]
    DNSQueryFailed(DNSError),
    DNSLookupFailed,
    #[allow(dead_code)]
    SocketConnectionError(ConnectError),
}

/// Opens plain TCP sessions over the WiFi stack, one at a time.
pub struct TcpConnector {
    stack: Stack<'static>,
    rx_buffer: &'static mut [u8; RX_BUFFER_SIZE],
    tx_buffer: &'static mut [u8; TX_BUFFER_SIZE],
}

impl TcpConnector {
    pub fn new(
        stack: Stack<'static>,
        rx_buffer: &'static mut [u8; RX_BUFFER_SIZE],
        tx_buffer: &'static mut [u8; TX_BUFFER_SIZE],
    ) -> Self {
        Self {
            stack,
            rx_buffer,
            tx_buffer,
        }
    }
}

impl Connector for TcpConnector {
    type Error = Error;
    type Connection<'c> = Transport<'c>;

    async fn open(&mut self, host: &str, port: u16) -> Result<Self::Connection<'_>, Self::Error> {
        let addr = self
            .stack
            .dns_query(host, DnsQueryType::A)
            .await
            .map_err(Error::DNSQueryFailed)?
            .first()
            .copied()
            .ok_or(Error::DNSLookupFailed)?;

        let mut socket = TcpSocket::new(self.stack, &mut self.rx_buffer[..], &mut self.tx_buffer[..]);
        socket.set_timeout(Some(Duration::from_secs(SOCKET_TIMEOUT_SECS)));

        log::info!("Connecting TCP socket to {}:{}", host, port);
        socket
            .connect((addr, port))
            .await
            .map_err(Error::SocketConnectionError)?;
        log::info!("TCP connected");

        Ok(Transport { session: socket })
    }
}

/// Connected TCP session
pub struct Transport<'a> {
    session: TcpSocket<'a>,
}

impl ErrorType for Transport<'_> {
    type Error = TcpError;
}

impl Read for Transport<'_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, TcpError> {
        self.session.read(buf).await
    }
}

impl ReadReady for Transport<'_> {
    fn read_ready(&mut self) -> Result<bool, TcpError> {
        self.session.read_ready()
    }
}

impl Write for Transport<'_> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, TcpError> {
        self.session.write(buf).await
    }

    async fn flush(&mut self) -> Result<(), TcpError> {
        self.session.flush().await
    }
}

impl Connection for Transport<'_> {
    fn close(&mut self) {
        log::debug!("Closing TCP socket");
        self.session.close();
    }
}
