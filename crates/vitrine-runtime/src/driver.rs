#![forbid(unsafe_code)]

//! Frame pump for a [`SelectionController`].

use std::time::Duration;

use crate::clock::FrameClock;
use crate::controller::SelectionController;

/// Owns a controller and feeds it one frame per call.
///
/// Hosts with a refresh callback call [`frame`](Self::frame); headless
/// callers use [`step`](Self::step) or
/// [`run_until_settled`](Self::run_until_settled) with a fixed delta.
#[derive(Debug)]
pub struct FrameDriver {
    controller: SelectionController,
    clock: FrameClock,
    frames: u64,
}

impl FrameDriver {
    #[must_use]
    pub fn new(controller: SelectionController) -> Self {
        Self::with_clock(controller, FrameClock::new())
    }

    #[must_use]
    pub fn with_clock(controller: SelectionController, clock: FrameClock) -> Self {
        Self {
            controller,
            clock,
            frames: 0,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &SelectionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SelectionController {
        &mut self.controller
    }

    #[must_use]
    pub fn into_controller(self) -> SelectionController {
        self.controller
    }

    /// Frames driven so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Drive one frame using the wall clock.
    pub fn frame(&mut self) -> Duration {
        let dt = self.clock.tick();
        self.step(dt);
        dt
    }

    /// Drive one frame of `dt`.
    pub fn step(&mut self, dt: Duration) {
        self.frames += 1;
        self.controller.tick(dt);
    }

    /// Step with `dt` until every group settles or `max_frames` elapse.
    ///
    /// Returns the number of frames driven, or `None` if the budget ran out.
    pub fn run_until_settled(&mut self, dt: Duration, max_frames: usize) -> Option<usize> {
        for n in 0..max_frames {
            if self.controller.is_settled() {
                return Some(n);
            }
            self.step(dt);
        }
        if self.controller.is_settled() {
            Some(max_frames)
        } else {
            tracing::debug!(max_frames, "frame budget exhausted before settling");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SwitcherConfig;
    use crate::diagnostics::TracingSink;
    use crate::registry::Registry;

    #[test]
    fn empty_controller_is_settled() {
        let controller =
            SelectionController::new(Registry::default(), SwitcherConfig::default(), TracingSink);
        let mut driver = FrameDriver::new(controller);
        assert_eq!(
            driver.run_until_settled(Duration::from_millis(16), 10),
            Some(0)
        );
        driver.frame();
        assert_eq!(driver.frames(), 1);
    }
}
