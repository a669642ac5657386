use embassy_time::{Instant, Timer};
use embedded_hal_async::delay::DelayNs;

use esp32_tank_sensor::clock::Clock;

/// Embassy timer driver backed clock
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl DelayNs for SystemClock {
    async fn delay_ns(&mut self, ns: u32) {
        Timer::after_nanos(ns.into()).await
    }

    async fn delay_us(&mut self, us: u32) {
        Timer::after_micros(us.into()).await
    }

    async fn delay_ms(&mut self, ms: u32) {
        Timer::after_millis(ms.into()).await
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
