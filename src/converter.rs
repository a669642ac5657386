use crate::config::CalibrationConfig;

/// Smallest usable calibrated voltage span, in volts
const MIN_VOLTAGE_SPAN: f32 = 0.001;

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

impl CalibrationConfig {
    /// Maps a transducer voltage onto `[0, full_scale]`.
    ///
    /// Voltages outside `[voltage_min, voltage_max]` saturate at the range
    /// ends. A span narrower than 1 mV is a calibration mistake and yields 0.
    pub fn voltage_to_quantity(&self, voltage: f32) -> f32 {
        let span = self.voltage_max - self.voltage_min;
        if span < MIN_VOLTAGE_SPAN {
            return 0.0;
        }

        let ratio = clamp((voltage - self.voltage_min) / span, 0.0, 1.0);
        ratio * self.full_scale
    }

    /// Converts a (possibly averaged) raw ADC code to volts, within `[0, reference_voltage]`.
    pub fn raw_to_voltage(&self, raw: f32) -> f32 {
        if self.raw_max == 0 {
            return 0.0;
        }

        let voltage = raw * self.reference_voltage / self.raw_max as f32;
        clamp(voltage, 0.0, self.reference_voltage)
    }
}
