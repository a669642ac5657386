use embassy_time::Duration;

use crate::clock::Clock;
use crate::config::TankGeometry;
use crate::constants::LINK_CONNECT_TIMEOUT_MS;
use crate::link::{ConnectionState, LinkHardware, LinkManager};
use crate::sampler::{AnalogInput, Sampler};
use crate::tank::TankLevel;
use crate::upload::{Connector, UploadClient};

#[derive(Debug)]
pub enum Error {
    LinkUnavailable,
    TransportConnectFailed,
    SendFailed,
    ResponseTimeout,
}

/// One sample-convert-transmit cycle.
pub struct Measurement<'a, A, L, N, C> {
    sampler: Sampler<'a, A, C>,
    link: LinkManager<'a, L, C>,
    uploader: UploadClient<'a, N, C>,
    tank: &'a TankGeometry,
}

impl<'a, A, L, N, C> Measurement<'a, A, L, N, C>
where
    A: AnalogInput,
    L: LinkHardware,
    N: Connector,
    C: Clock,
{
    pub fn new(
        sampler: Sampler<'a, A, C>,
        link: LinkManager<'a, L, C>,
        uploader: UploadClient<'a, N, C>,
        tank: &'a TankGeometry,
    ) -> Self {
        Self {
            sampler,
            link,
            uploader,
            tank,
        }
    }

    pub fn link(&self) -> &LinkManager<'a, L, C> {
        &self.link
    }

    pub async fn take(&mut self) -> Result<TankLevel, Error> {
        // Measure sensor data first
        let reading = self.sampler.sample().await;
        let level = self.tank.level(&reading);
        log::info!(
            "Voltage: {:.3} V, pressure: {:.3} kPa, depth: {:.3} m, volume: {:.2} L",
            level.voltage,
            level.pressure_kpa,
            level.depth_m,
            level.volume_liters
        );

        let link = if self
            .link
            .ensure_connected(Duration::from_millis(LINK_CONNECT_TIMEOUT_MS))
            .await
        {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        };

        self.uploader
            .upload(link, &level)
            .await
            .into_result()?;

        Ok(level)
    }
}
