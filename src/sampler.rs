use log::debug;

use crate::clock::Clock;
use crate::config::CalibrationConfig;
use crate::constants::{SAMPLE_COUNT, SAMPLE_DELAY_MS};

/// Raw access to the analog front end.
///
/// The channel is bound when the adapter is built, readings never fail.
pub trait AnalogInput {
    fn read_raw(&mut self) -> u16;
}

/// One averaged acquisition, immutable once taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub raw: u16,
    pub voltage: f32,
    pub pressure_kpa: f32,
}

pub struct Sampler<'a, A, C> {
    adc: A,
    clock: C,
    calibration: &'a CalibrationConfig,
}

impl<'a, A, C> Sampler<'a, A, C>
where
    A: AnalogInput,
    C: Clock,
{
    pub fn new(adc: A, clock: C, calibration: &'a CalibrationConfig) -> Self {
        Self {
            adc,
            clock,
            calibration,
        }
    }

    /// Mean of [`SAMPLE_COUNT`] raw codes spaced by [`SAMPLE_DELAY_MS`].
    pub async fn average_raw(&mut self) -> f32 {
        let mut sum: u32 = 0;
        for _ in 0..SAMPLE_COUNT {
            let raw = self.adc.read_raw().min(self.calibration.raw_max);
            sum += u32::from(raw);
            self.clock.delay_ms(SAMPLE_DELAY_MS).await;
        }
        sum as f32 / SAMPLE_COUNT as f32
    }

    pub async fn sample_averaged(&mut self) -> f32 {
        let mean = self.average_raw().await;
        self.calibration.raw_to_voltage(mean)
    }

    pub async fn sample(&mut self) -> SensorReading {
        let mean = self.average_raw().await;
        let voltage = self.calibration.raw_to_voltage(mean);
        let pressure_kpa = self.calibration.voltage_to_quantity(voltage);
        debug!(
            "ADC mean {:.1} -> {:.3} V -> {:.3} kPa",
            mean, voltage, pressure_kpa
        );

        SensorReading {
            raw: (mean + 0.5) as u16,
            voltage,
            pressure_kpa,
        }
    }
}
