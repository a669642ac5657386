use std::{env, error::Error, fs, path::Path};

use serde::Deserialize;

#[derive(Deserialize)]
struct RawConfig {
    device_id: String,
    measurement_interval_seconds: u16,
    wifi: RawWifi,
    endpoint: RawEndpoint,
    calibration: RawCalibration,
    tank: RawTank,
}

#[derive(Deserialize)]
struct RawWifi {
    ssid: String,
    psk: String,
}

#[derive(Deserialize)]
struct RawEndpoint {
    host: String,
    port: u16,
}

#[derive(Deserialize)]
struct RawCalibration {
    reference_voltage: f32,
    raw_max: u16,
    voltage_min: f32,
    voltage_max: f32,
    full_scale: f32,
}

#[derive(Deserialize)]
struct RawTank {
    area_m2: f32,
    fluid_density_kg_m3: f32,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Tell Cargo to rerun if toml changes
    println!("cargo:rerun-if-changed=cfg.toml");
    println!("cargo:rerun-if-changed=cfg.toml.example");

    // Local cfg.toml wins, the checked-in example keeps host builds working
    let path = if Path::new("cfg.toml").exists() {
        "cfg.toml"
    } else {
        "cfg.toml.example"
    };
    let toml_str = fs::read_to_string(path)?;
    let raw: RawConfig = toml::from_str(&toml_str)?;

    // Generate Rust code
    let code = format!(
        r#"
        pub const CONFIG: Config = Config {{
            device_id: {id:?},
            measurement_interval_seconds: {intv},
            link: LinkCredentials {{
                ssid: {ssid:?},
                secret: {psk:?},
            }},
            endpoint: EndpointConfig {{
                host: {host:?},
                port: {port},
            }},
            calibration: CalibrationConfig {{
                reference_voltage: {vref:?},
                raw_max: {raw_max},
                voltage_min: {vmin:?},
                voltage_max: {vmax:?},
                full_scale: {fs:?},
            }},
            tank: TankGeometry {{
                area_m2: {area:?},
                fluid_density_kg_m3: {density:?},
            }},
        }};
    "#,
        id = raw.device_id,
        intv = raw.measurement_interval_seconds,
        ssid = raw.wifi.ssid,
        psk = raw.wifi.psk,
        host = raw.endpoint.host,
        port = raw.endpoint.port,
        vref = raw.calibration.reference_voltage,
        raw_max = raw.calibration.raw_max,
        vmin = raw.calibration.voltage_min,
        vmax = raw.calibration.voltage_max,
        fs = raw.calibration.full_scale,
        area = raw.tank.area_m2,
        density = raw.tank.fluid_density_kg_m3,
    );

    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("config.rs");
    fs::write(dest_path, code)?;
    Ok(())
}
