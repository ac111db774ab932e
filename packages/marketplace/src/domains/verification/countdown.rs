use std::time::Duration;

use tokio::time::Instant;

/// Whole-second countdown used to throttle code resends.
///
/// Reads the tokio clock so a paused test runtime can drive it.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    started: Instant,
    duration: Duration,
}

impl Countdown {
    pub fn start(duration: Duration) -> Self {
        Self {
            started: Instant::now(),
            duration,
        }
    }

    /// Seconds left, dropping by one each full second and never below zero.
    pub fn remaining_secs(&self) -> u64 {
        self.duration
            .as_secs()
            .saturating_sub(self.started.elapsed().as_secs())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_secs() == 0
    }
}
