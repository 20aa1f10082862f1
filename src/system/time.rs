//! Time keeping module for PineTime

use embassy_time::{Duration, Instant};
use pinetime_watchface::ClockSample;

/// Wall clock derived from a known Unix time and the system timer.
#[derive(Clone, Copy)]
pub struct Clock {
    /// Unix seconds at `instant`
    epoch: i64,
    /// Related system time
    instant: Instant,
}

impl Clock {
    /// Start the clock at `epoch` Unix seconds
    pub fn new(epoch: i64) -> Self {
        Self {
            epoch,
            instant: Instant::now(),
        }
    }

    /// Current wall-clock time
    pub fn now(&self) -> ClockSample {
        ClockSample(self.epoch + self.instant.elapsed().as_secs() as i64)
    }

    /// Time left until the next full minute
    pub fn until_next_minute(&self) -> Duration {
        let elapsed = self.instant.elapsed();
        let secs = self.epoch + elapsed.as_secs() as i64;
        let into_minute = Duration::from_secs(secs.rem_euclid(60) as u64)
            + Duration::from_micros(elapsed.as_micros() % 1_000_000);
        Duration::from_secs(60) - into_minute
    }
}
