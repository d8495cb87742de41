#![forbid(unsafe_code)]

//! Core: element handles, ids, completion signals, and tween primitives.
//!
//! Everything here is single-threaded. Handles are shared through `Rc` and
//! all mutation happens from one cooperative frame loop.

pub mod animation;
pub mod element;
pub mod error;
pub mod ids;
pub mod signal;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use element::{ElementHandle, ElementId, ElementRef, ScrambleCell, VisualState};
pub use error::LookupError;
pub use ids::{GroupId, SlotId};
pub use signal::{CancelToken, Completer, Completion, Outcome, completion};
