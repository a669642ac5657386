use core::fmt::Debug;
use core::ops::{Deref, DerefMut};

use embassy_time::Duration;
use embedded_io_async::{Read, ReadReady, Write};
use heapless::Vec;
use log::{debug, error, info, warn};

use crate::clock::{wait_step, Clock};
use crate::config::EndpointConfig;
use crate::constants::*;
use crate::link::ConnectionState;
use crate::request::format_update_request;
use crate::tank::TankLevel;

/// Stream to the remote endpoint.
pub trait Connection: Read + Write + ReadReady {
    fn close(&mut self);
}

/// Opens connections to the remote endpoint.
pub trait Connector {
    type Error: Debug;
    type Connection<'c>: Connection
    where
        Self: 'c;

    async fn open(&mut self, host: &str, port: u16) -> Result<Self::Connection<'_>, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoLink,
}

/// Result of a single upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Skipped(SkipReason),
    Sent,
    ConnectFailed,
    SendFailed,
    ResponseTimeout,
}

/// Closes the wrapped connection when dropped.
struct Session<T: Connection> {
    connection: T,
}

impl<T: Connection> Deref for Session<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.connection
    }
}

impl<T: Connection> DerefMut for Session<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.connection
    }
}

impl<T: Connection> Drop for Session<T> {
    fn drop(&mut self) {
        self.connection.close();
    }
}

pub struct UploadClient<'a, N, C> {
    connector: N,
    clock: C,
    endpoint: &'a EndpointConfig,
    response_timeout: Duration,
    poll_interval: Duration,
}

impl<'a, N, C> UploadClient<'a, N, C>
where
    N: Connector,
    C: Clock,
{
    pub fn new(connector: N, clock: C, endpoint: &'a EndpointConfig) -> Self {
        Self {
            connector,
            clock,
            endpoint,
            response_timeout: Duration::from_millis(RESPONSE_TIMEOUT_MS),
            poll_interval: Duration::from_millis(RESPONSE_POLL_INTERVAL_MS),
        }
    }

    /// Sends `level` to the endpoint, provided the link is up.
    ///
    /// The connection opened here is closed on every return path.
    pub async fn upload(&mut self, link: ConnectionState, level: &TankLevel) -> UploadOutcome {
        if link != ConnectionState::Connected {
            warn!("WiFi not connected. Skipping upload.");
            return UploadOutcome::Skipped(SkipReason::NoLink);
        }

        info!(
            "Connecting to server: {}:{}",
            self.endpoint.host, self.endpoint.port
        );
        let connection = match self
            .connector
            .open(self.endpoint.host, self.endpoint.port)
            .await
        {
            Ok(connection) => connection,
            Err(e) => {
                error!("Connection to server failed: {:?}", e);
                return UploadOutcome::ConnectFailed;
            }
        };
        let mut session = Session { connection };

        let Ok(request) = format_update_request(self.endpoint.host, level) else {
            error!("Request does not fit in {} bytes", REQUEST_BUFFER_SIZE);
            return UploadOutcome::SendFailed;
        };
        debug!("Sending request: {}", request);

        if let Err(e) = session.write_all(request.as_bytes()).await {
            error!("Failed to send request: {:?}", e);
            return UploadOutcome::SendFailed;
        }
        if let Err(e) = session.flush().await {
            error!("Failed to flush request: {:?}", e);
            return UploadOutcome::SendFailed;
        }

        // EOF or a failed read is not an answer, keep waiting for real bytes
        let mut chunk = [0u8; RESPONSE_CHUNK_SIZE];
        let mut peer_closed = false;
        let start = self.clock.now();
        let received = loop {
            match session.read_ready() {
                Ok(true) => match session.read(&mut chunk).await {
                    Ok(0) => peer_closed = true,
                    Ok(n) => break n,
                    Err(e) => debug!("Response read failed: {:?}", e),
                },
                Ok(false) => {}
                Err(e) => debug!("Response not ready: {:?}", e),
            }

            if self.clock.elapsed_since(start) >= self.response_timeout {
                if peer_closed {
                    warn!("Server timeout! Connection closed without a response");
                } else {
                    warn!("Server timeout!");
                }
                return UploadOutcome::ResponseTimeout;
            }

            wait_step(&mut self.clock, start, self.response_timeout, self.poll_interval).await;
        };

        info!("Server response:");
        let lines = drain_response(&mut *session, &chunk[..received]).await;
        info!("Data uploaded successfully! ({} response lines)", lines);

        UploadOutcome::Sent
    }
}

/// Logs `received` and every response line still readable, returns how many
/// lines were seen.
///
/// Lines end on `\n`, a trailing `\r` is dropped and so are empty lines.
/// Stops as soon as no more data is ready, at EOF or on a read error.
async fn drain_response<T: Read + ReadReady>(connection: &mut T, received: &[u8]) -> usize {
    let mut chunk = [0u8; RESPONSE_CHUNK_SIZE];
    let mut line: Vec<u8, RESPONSE_LINE_MAX> = Vec::new();
    let mut lines = split_lines(received, &mut line);

    loop {
        match connection.read_ready() {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                debug!("Response drain stopped: {:?}", e);
                break;
            }
        }

        let n = match connection.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!("Failed to read response: {:?}", e);
                break;
            }
        };
        lines += split_lines(&chunk[..n], &mut line);
    }

    lines + emit_line(&mut line)
}

fn split_lines(bytes: &[u8], line: &mut Vec<u8, RESPONSE_LINE_MAX>) -> usize {
    let mut lines = 0;
    for &byte in bytes {
        if byte == b'\n' {
            lines += emit_line(line);
        } else {
            // overlong lines are truncated
            line.push(byte).ok();
        }
    }
    lines
}

fn emit_line(line: &mut Vec<u8, RESPONSE_LINE_MAX>) -> usize {
    let mut text = line.as_slice();
    if let Some(stripped) = text.strip_suffix(b"\r") {
        text = stripped;
    }

    let emitted = if text.is_empty() {
        0
    } else {
        match core::str::from_utf8(text) {
            Ok(text) => info!("{}", text),
            Err(_) => info!("{:?}", text),
        }
        1
    };

    line.clear();
    emitted
}

impl UploadOutcome {
    pub fn into_result(self) -> Result<(), crate::measurement::Error> {
        use crate::measurement::Error;

        match self {
            UploadOutcome::Sent => Ok(()),
            UploadOutcome::Skipped(SkipReason::NoLink) => Err(Error::LinkUnavailable),
            UploadOutcome::ConnectFailed => Err(Error::TransportConnectFailed),
            UploadOutcome::SendFailed => Err(Error::SendFailed),
            UploadOutcome::ResponseTimeout => Err(Error::ResponseTimeout),
        }
    }
}
