#![forbid(unsafe_code)]

//! Vitrine runtime.
//!
//! Ties discovered page bindings to the transition engine:
//!
//! - [`Registry`] - groups, slots, and triggers read once from a [`Discovery`] source
//! - [`SelectionController`] - per-group selection state machine
//! - [`TransitionScheduler`] - timeline of hide/show entries with relative start offsets
//! - [`SwitcherConfig`] - timing and scramble configuration, env-overridable
//! - [`FrameDriver`] - pumps the controller from a [`FrameClock`] or fixed steps
//!
//! # Frame model
//!
//! Everything runs on one thread. The host calls [`FrameDriver::frame`] (or
//! [`SelectionController::tick`] with its own delta) once per display refresh.
//! Selections are processed in call order; a selection during a running
//! transition cancels the in-flight slots and snaps them hidden before the
//! new transition is scheduled.

pub mod clock;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod driver;
pub mod registry;
pub mod scheduler;

pub use clock::FrameClock;
pub use config::{ConfigError, SwitcherConfig, SwitcherConfigParse};
pub use controller::{ActiveState, GroupPhase, SelectionController};
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use driver::FrameDriver;
pub use registry::{Discovery, Group, Registry, Slot, SlotElements, TextRegion, Trigger};
pub use scheduler::{
    StartOffset, TransitionAction, TransitionEntry, TransitionScheduler, TransitionTiming,
};
