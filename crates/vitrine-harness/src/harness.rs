#![forbid(unsafe_code)]

//! End-to-end driver.

use std::time::Duration;

use vitrine_core::{GroupId, LookupError, SlotId};
use vitrine_runtime::{FrameDriver, Registry, SelectionController, SwitcherConfig};

use crate::page::MockPage;
use crate::sink::RecordingSink;

/// One 60 Hz frame.
pub const DEFAULT_FRAME: Duration = Duration::from_micros(16_667);

const MAX_FRAMES: usize = 20_000;

/// A controller wired to a [`MockPage`] and a [`RecordingSink`].
#[derive(Debug)]
pub struct Harness {
    page: MockPage,
    sink: RecordingSink,
    driver: FrameDriver,
    frame: Duration,
}

impl Harness {
    /// Build the controller (all slots hidden, nothing selected yet).
    #[must_use]
    pub fn new(page: MockPage, config: SwitcherConfig) -> Self {
        let sink = RecordingSink::new();
        let controller = SelectionController::new(Registry::discover(&page), config, sink.clone());
        Self {
            page,
            sink,
            driver: FrameDriver::new(controller),
            frame: DEFAULT_FRAME,
        }
    }

    /// Build and run initialization (defaults scheduled, not yet settled).
    #[must_use]
    pub fn initialized(page: MockPage, config: SwitcherConfig) -> Self {
        let mut harness = Self::new(page, config);
        harness.initialize();
        harness
    }

    /// Use a different fixed frame delta.
    #[must_use]
    pub fn with_frame(mut self, frame: Duration) -> Self {
        self.frame = frame;
        self
    }

    pub fn initialize(&mut self) {
        self.driver.controller_mut().initialize();
    }

    pub fn select(&mut self, group: &str, slot: &str) -> Result<(), LookupError> {
        self.driver
            .controller_mut()
            .select(&GroupId::new(group), &SlotId::new(slot))
    }

    /// Drive `n` frames.
    pub fn run_frames(&mut self, n: usize) {
        for _ in 0..n {
            self.driver.step(self.frame);
        }
    }

    /// Drive frames until every group settles. Returns the frame count, or
    /// `None` if the engine never settled.
    pub fn run_until_settled(&mut self) -> Option<usize> {
        self.driver.run_until_settled(self.frame, MAX_FRAMES)
    }

    /// Simulated time driven so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.frame
            .saturating_mul(u32::try_from(self.driver.frames()).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub fn page(&self) -> &MockPage {
        &self.page
    }

    #[must_use]
    pub fn sink(&self) -> &RecordingSink {
        &self.sink
    }

    #[must_use]
    pub fn controller(&self) -> &SelectionController {
        self.driver.controller()
    }

    /// Slots whose root is rendered right now.
    #[must_use]
    pub fn rendered(&self, group: &str) -> Vec<String> {
        self.page.rendered_slots(group)
    }

    /// Active slot per the controller's record.
    #[must_use]
    pub fn active(&self, group: &str) -> Option<String> {
        self.controller()
            .active_slot(&GroupId::new(group))
            .map(ToString::to_string)
    }
}
