#![forbid(unsafe_code)]

//! Vitrine test harness.
//!
//! Runs the selection engine against an in-memory page so end-to-end
//! behavior can be asserted frame by frame without a browser.
//!
//! - [`MockPage`] - groups, slots, and triggers backed by [`RecordingElement`]s
//! - [`RecordingSink`] - collects lookup failures
//! - [`Harness`] - a controller, its page, and its sink, driven with a fixed frame delta
//! - [`logging::init_test_logging`] - `RUST_LOG`-filtered tracing output for tests
//!
//! [`RecordingElement`]: vitrine_core::testing::RecordingElement

pub mod harness;
pub mod logging;
pub mod page;
pub mod sink;

pub use harness::{DEFAULT_FRAME, Harness};
pub use page::{GroupBuilder, MockPage};
pub use sink::RecordingSink;
