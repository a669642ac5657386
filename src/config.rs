pub struct Config {
    // Device ID (used as DHCP hostname)
    pub device_id: &'static str,

    // Delay between two upload cycles in seconds
    pub measurement_interval_seconds: u16,

    // Wi-Fi association parameters
    pub link: LinkCredentials,

    // Remote HTTP endpoint receiving the readings
    pub endpoint: EndpointConfig,

    // Pressure transducer calibration
    pub calibration: CalibrationConfig,

    // Tank dimensions used to derive depth and volume
    pub tank: TankGeometry,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationConfig {
    // ADC reference voltage, volts
    pub reference_voltage: f32,

    // Highest raw code the ADC can report
    pub raw_max: u16,

    // Transducer output at 0% of full scale, volts
    pub voltage_min: f32,

    // Transducer output at 100% of full scale, volts
    pub voltage_max: f32,

    // Pressure at 100% of full scale, kPa
    pub full_scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkCredentials {
    // Wi-Fi SSID to connect to
    pub ssid: &'static str,

    // Wi-Fi pre-shared key (password)
    pub secret: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointConfig {
    // Server hostname or IP address
    pub host: &'static str,

    // Server TCP port
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankGeometry {
    // Horizontal cross-section of the tank, square meters
    pub area_m2: f32,

    // Density of the stored liquid, kg/m³
    pub fluid_density_kg_m3: f32,
}

// config values are generated at compile time
include!(concat!(env!("OUT_DIR"), "/config.rs"));
