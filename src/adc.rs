use esp_hal::analog::adc::{Adc, AdcPin};
use esp_hal::peripherals::{ADC1, GPIO34};
use esp_hal::Blocking;

use esp32_tank_sensor::sampler::AnalogInput;

/// Pressure transducer wired to GPIO34 (ADC1 channel 6)
pub struct PressureAdc {
    adc: Adc<'static, ADC1<'static>, Blocking>,
    pin: AdcPin<GPIO34<'static>, ADC1<'static>>,
}

impl PressureAdc {
    pub fn new(
        adc: Adc<'static, ADC1<'static>, Blocking>,
        pin: AdcPin<GPIO34<'static>, ADC1<'static>>,
    ) -> Self {
        Self { adc, pin }
    }
}

impl AnalogInput for PressureAdc {
    fn read_raw(&mut self) -> u16 {
        // a oneshot conversion only ever reports WouldBlock while it runs
        loop {
            if let Ok(raw) = self.adc.read_oneshot(&mut self.pin) {
                return raw;
            }
        }
    }
}
