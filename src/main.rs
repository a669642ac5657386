#![no_std]
#![no_main]

use static_cell::StaticCell;

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{self as hal};
use esp_println::logger::init_logger;
use esp_wifi::EspWifiController;

use hal::{
    analog::adc::{Adc, AdcConfig, Attenuation},
    rng::Rng,
    timer::timg::TimerGroup,
};

mod adc;
mod timebase;
mod transport;
mod wifi;

use esp32_tank_sensor::config::CONFIG;
use esp32_tank_sensor::constants::*;
use esp32_tank_sensor::link::LinkManager;
use esp32_tank_sensor::measurement::Measurement;
use esp32_tank_sensor::sampler::Sampler;
use esp32_tank_sensor::upload::UploadClient;

use adc::PressureAdc;
use timebase::SystemClock;
use transport::TcpConnector;
use wifi::Wifi;

esp_bootloader_esp_idf::esp_app_desc!();

type TankMeasurement = Measurement<'static, PressureAdc, Wifi, TcpConnector, SystemClock>;

static WIFI_INIT: StaticCell<EspWifiController<'static>> = StaticCell::new();
static RX_BUF: StaticCell<[u8; RX_BUFFER_SIZE]> = StaticCell::new();
static TX_BUF: StaticCell<[u8; TX_BUFFER_SIZE]> = StaticCell::new();

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    init_logger(log::LevelFilter::Info);
    log::info!("Tank sensor v{} ({})", VERSION, CONFIG.device_id);

    let peripherals = esp_hal::init(esp_hal::Config::default());

    let mut rng = Rng::new(peripherals.RNG);

    esp_alloc::heap_allocator!(size: HEAP_SIZE);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let timg1 = TimerGroup::new(peripherals.TIMG1);

    esp_hal_embassy::init(timg0.timer0);

    let mut adc_config = AdcConfig::new();
    let pin = adc_config.enable_pin(peripherals.GPIO34, Attenuation::_11dB);
    let pressure_adc = PressureAdc::new(Adc::new(peripherals.ADC1, adc_config), pin);

    let wifi_init = WIFI_INIT.init(esp_wifi::init(timg1.timer0, rng.clone()).unwrap());
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;
    let wifi = Wifi::new(wifi_init, peripherals.WIFI, seed, spawner).unwrap();

    let connector = TcpConnector::new(
        wifi.stack,
        RX_BUF.init([0; RX_BUFFER_SIZE]),
        TX_BUF.init([0; TX_BUFFER_SIZE]),
    );

    let measurement = Measurement::new(
        Sampler::new(pressure_adc, SystemClock, &CONFIG.calibration),
        LinkManager::new(wifi, SystemClock, &CONFIG.link),
        UploadClient::new(connector, SystemClock, &CONFIG.endpoint),
        &CONFIG.tank,
    );

    spawner.spawn(main_task(measurement)).ok();
}

#[embassy_executor::task]
async fn main_task(mut measurement: TankMeasurement) {
    loop {
        // Each cycle is a single attempt, failures only get logged
        if let Err(e) = measurement.take().await {
            log::error!("Measurement error: {:?}", e);
        }

        Timer::after(Duration::from_secs(
            CONFIG.measurement_interval_seconds.into(),
        ))
        .await;
    }
}
