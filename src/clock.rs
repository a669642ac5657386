use embassy_time::{Duration, Instant};
use embedded_hal_async::delay::DelayNs;

/// Time source shared by the sampling and network loops.
///
/// Waiting goes through [`DelayNs`], so every loop yields to the executor
/// instead of spinning on the status it polls.
pub trait Clock: DelayNs {
    fn now(&self) -> Instant;

    fn elapsed_since(&self, start: Instant) -> Duration {
        self.now().saturating_duration_since(start)
    }
}

/// Waits for at most `step`, never past `deadline` measured from `start`.
pub(crate) async fn wait_step<C: Clock>(clock: &mut C, start: Instant, deadline: Duration, step: Duration) {
    let elapsed = clock.elapsed_since(start);
    let remaining = deadline.checked_sub(elapsed).unwrap_or(Duration::from_ticks(0));
    let wait = if remaining < step { remaining } else { step };
    clock.delay_us(wait.as_micros() as u32).await;
}
