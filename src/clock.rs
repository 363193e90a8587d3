//! Timing collaborator used by the pacing step.

use std::thread;
use std::time::{Duration, Instant};

/// A monotonic millisecond clock plus a blocking sleep.
pub trait Clock {
    fn now_millis(&self) -> u64;
    fn sleep_millis(&mut self, millis: u64);
}

/// Wall-clock implementation backed by `Instant` and `thread::sleep`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn sleep_millis(&mut self, millis: u64) {
        thread::sleep(Duration::from_millis(millis));
    }
}

/// Time left in the frame budget, or `None` if the frame ran long.
///
/// A late frame is not compensated; the next one simply starts late.
pub fn pacing_delay(elapsed: u64, budget: u64) -> Option<u64> {
    (elapsed < budget).then(|| budget - elapsed)
}
