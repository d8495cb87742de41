#![forbid(unsafe_code)]

//! Wall-clock frame deltas.
//!
//! Uses `web_time` so the same code runs on wasm32 (where `std::time::Instant`
//! panics) and native targets.

use std::time::Duration;

use web_time::Instant;

/// Longest delta a single frame may report.
pub const DEFAULT_MAX_STEP: Duration = Duration::from_millis(100);

/// Measures time between display refreshes.
///
/// A delta longer than the maximum step (a backgrounded tab, a debugger
/// pause) is clamped so animations resume where they left off instead of
/// jumping to their end.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_step: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: None,
            max_step: DEFAULT_MAX_STEP,
        }
    }

    #[must_use]
    pub fn with_max_step(mut self, max_step: Duration) -> Self {
        self.max_step = max_step;
        self
    }

    #[must_use]
    pub fn max_step(&self) -> Duration {
        self.max_step
    }

    /// Delta since the previous call. The first call returns zero.
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    /// Delta between the previous call and `now`.
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        dt.min(self.max_step)
    }

    /// Forget the previous frame (e.g. after the page becomes visible again).
    pub fn reset(&mut self) {
        self.last = None;
    }
}
