use core::net::Ipv4Addr;
use core::str::FromStr;

use embassy_executor::Spawner;
use embassy_net::{Runner, Stack, StackResources};
use esp_wifi::wifi::{
    ClientConfiguration, Configuration, WifiController, WifiDevice, WifiState,
};
use esp_wifi::EspWifiController;
use heapless::String;
use log::{error, info};
use static_cell::StaticCell;

use esp32_tank_sensor::config::CONFIG;
use esp32_tank_sensor::link::{LinkHardware, LinkStatus};

static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();

/// Station interface plus the IP stack running on top of it.
pub struct Wifi {
    controller: WifiController<'static>,
    pub stack: Stack<'static>,
}

#[derive(Debug)]
pub enum Error {
    WifiInitFailed,
    HostnameTooLong,
    SpawnFailed,
}

impl Wifi {
    pub fn new(
        init: &'static EspWifiController<'static>,
        wifi: esp_hal::peripherals::WIFI<'static>,
        seed: u64,
        spawner: Spawner,
    ) -> Result<Self, Error> {
        let (controller, interfaces) =
            esp_wifi::wifi::new(init, wifi).map_err(|_| Error::WifiInitFailed)?;

        let mut dhcp_config = embassy_net::DhcpConfig::default();
        dhcp_config.hostname = Some(
            String::<32>::from_str(CONFIG.device_id).map_err(|_| Error::HostnameTooLong)?,
        );
        let config = embassy_net::Config::dhcpv4(dhcp_config);

        let resources = RESOURCES.init(StackResources::new());
        let (stack, runner) = embassy_net::new(interfaces.sta, config, resources, seed);

        spawner
            .spawn(net_task(runner))
            .map_err(|_| Error::SpawnFailed)?;

        Ok(Self { controller, stack })
    }
}

impl LinkHardware for Wifi {
    fn associate(&mut self, ssid: &str, secret: &str) {
        let client_config = Configuration::Client(ClientConfiguration {
            ssid: ssid.into(),
            password: secret.into(),
            ..Default::default()
        });
        if let Err(e) = self.controller.set_configuration(&client_config) {
            error!("Failed to set WiFi config: {:?}", e);
            return;
        }

        if !matches!(self.controller.is_started(), Ok(true)) {
            info!("Starting wifi");
            if let Err(e) = self.controller.start() {
                error!("Failed to start WiFi: {:?}", e);
                return;
            }
        }

        if let Err(e) = self.controller.connect() {
            error!("Failed to connect to wifi: {:?}", e);
        }
    }

    fn link_status(&mut self) -> LinkStatus {
        match esp_wifi::wifi::sta_state() {
            // associated, but only usable once DHCP handed out an address
            WifiState::StaConnected if self.stack.is_config_up() => LinkStatus::Connected,
            WifiState::StaConnected | WifiState::StaDisconnected => LinkStatus::Disconnected,
            WifiState::StaStopped => LinkStatus::ConnectionLost,
            _ => LinkStatus::Idle,
        }
    }

    fn local_address(&self) -> Option<Ipv4Addr> {
        self.stack.config_v4().map(|config| config.address.address())
    }
}

#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}
