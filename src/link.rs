use core::net::Ipv4Addr;

use embassy_time::Duration;
use log::{info, warn};

use crate::clock::{wait_step, Clock};
use crate::config::LinkCredentials;
use crate::constants::LINK_POLL_INTERVAL_MS;

/// Station status as reported by the radio driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Idle,
    NoNetwork,
    ConnectFailed,
    ConnectionLost,
    Disconnected,
    Connected,
}

/// Association state observed by the [`LinkManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Radio and IP layer, treated as a black box.
pub trait LinkHardware {
    /// Starts an association, progress is observed through [`LinkHardware::link_status`].
    fn associate(&mut self, ssid: &str, secret: &str);

    fn link_status(&mut self) -> LinkStatus;

    fn local_address(&self) -> Option<Ipv4Addr>;
}

pub struct LinkManager<'a, L, C> {
    hardware: L,
    clock: C,
    credentials: &'a LinkCredentials,
    poll_interval: Duration,
    state: ConnectionState,
}

impl<'a, L, C> LinkManager<'a, L, C>
where
    L: LinkHardware,
    C: Clock,
{
    pub fn new(hardware: L, clock: C, credentials: &'a LinkCredentials) -> Self {
        Self {
            hardware,
            clock,
            credentials,
            poll_interval: Duration::from_millis(LINK_POLL_INTERVAL_MS),
            state: ConnectionState::Disconnected,
        }
    }

    /// Last observed state, updated by [`LinkManager::refresh`] and [`LinkManager::ensure_connected`].
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Polls the hardware once and returns the resulting state.
    pub fn refresh(&mut self) -> ConnectionState {
        self.state = match (self.hardware.link_status(), self.state) {
            (LinkStatus::Connected, _) => ConnectionState::Connected,
            (_, ConnectionState::Connecting) => ConnectionState::Connecting,
            _ => ConnectionState::Disconnected,
        };
        self.state
    }

    /// Associates with the configured network unless already connected.
    ///
    /// Returns `true` once the link reports connected, `false` when `timeout`
    /// elapses first. Waiting never runs past `timeout`.
    pub async fn ensure_connected(&mut self, timeout: Duration) -> bool {
        self.state = ConnectionState::Disconnected;
        if self.refresh() == ConnectionState::Connected {
            return true;
        }

        info!("Connecting to WiFi: {:?}", self.credentials.ssid);
        self.hardware
            .associate(self.credentials.ssid, self.credentials.secret);
        self.state = ConnectionState::Connecting;

        let start = self.clock.now();
        loop {
            if self.refresh() == ConnectionState::Connected {
                match self.hardware.local_address() {
                    Some(address) => info!("WiFi connected, IP address: {}", address),
                    None => info!("WiFi connected"),
                }
                return true;
            }

            let elapsed = self.clock.elapsed_since(start);
            if elapsed >= timeout {
                break;
            }

            wait_step(&mut self.clock, start, timeout, self.poll_interval).await;
            info!(
                "Waiting for WiFi... ({} ms)",
                self.clock.elapsed_since(start).as_millis()
            );
        }

        self.state = ConnectionState::Disconnected;
        warn!(
            "WiFi connection failed after {} ms",
            self.clock.elapsed_since(start).as_millis()
        );
        false
    }
}
