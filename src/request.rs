use core::fmt::Write;

use heapless::String;

use crate::constants::REQUEST_BUFFER_SIZE;
use crate::tank::TankLevel;

/// Formats the `GET /update` request carrying one tank level.
///
/// Depth keeps 3 decimals, pressure and volume keep 2.
pub fn format_update_request(
    host: &str,
    level: &TankLevel,
) -> Result<String<REQUEST_BUFFER_SIZE>, core::fmt::Error> {
    let mut request: String<REQUEST_BUFFER_SIZE> = String::new();

    write!(
        request,
        "GET /update?depth={:.3}&pressure={:.2}&volume={:.2} HTTP/1.1\r\n",
        level.depth_m, level.pressure_kpa, level.volume_liters
    )?;
    write!(request, "Host: {}\r\n", host)?;
    write!(request, "Connection: close\r\n\r\n")?;

    Ok(request)
}
