#![forbid(unsafe_code)]

//! Vitrine public facade crate.
//!
//! Re-exports the types a host needs to wire a page into the selection
//! engine, plus a prelude for day-to-day use.
//!
//! ```ignore
//! use vitrine::prelude::*;
//!
//! let mut driver = vitrine::switcher_from_env(&page)?;
//! // once per display refresh:
//! driver.frame();
//! // from a trigger's click handler:
//! driver.controller_mut().select(&"pricing".into(), &"yearly".into())?;
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use vitrine_core::animation::{EasingFn, NAMED_EASINGS, easing_by_name};
pub use vitrine_core::{
    CancelToken, Completion, ElementHandle, ElementId, ElementRef, GroupId, LookupError, Outcome,
    ScrambleCell, SlotId, VisualState,
};

// --- Effect re-exports -----------------------------------------------------

pub use vitrine_fx::{ScrambleConfig, ScrambleEffect, ScrambleHandle};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use vitrine_runtime::{
    ActiveState, ConfigError, DiagnosticSink, Discovery, FrameClock, FrameDriver, GroupPhase,
    Registry, SelectionController, SlotElements, StartOffset, SwitcherConfig, TracingSink,
    TransitionEntry, TransitionScheduler, Trigger,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Vitrine hosts.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A select named an unbound group or slot.
    Lookup(LookupError),
    /// Configuration values were rejected.
    #[cfg(feature = "runtime")]
    Config(Vec<ConfigError>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lookup(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Config(errors) => {
                write!(f, "invalid configuration: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lookup(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Config(errors) => errors
                .first()
                .map(|e| e as &(dyn std::error::Error + 'static)),
        }
    }
}

impl From<LookupError> for Error {
    fn from(err: LookupError) -> Self {
        Self::Lookup(err)
    }
}

#[cfg(feature = "runtime")]
impl From<Vec<ConfigError>> for Error {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::Config(errors)
    }
}

/// Standard result type for Vitrine APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Entry points ---------------------------------------------------------

/// Discover `source`, select every group's default slot, and return a
/// driver ready for [`FrameDriver::frame`].
#[cfg(feature = "runtime")]
#[must_use]
pub fn switcher<D: Discovery + ?Sized>(source: &D, config: SwitcherConfig) -> FrameDriver {
    let mut controller = SelectionController::from_discovery(source, config);
    controller.initialize();
    FrameDriver::new(controller)
}

/// Like [`switcher`], with configuration read from `VITRINE_*` variables.
///
/// Fails if any variable was rejected, rather than silently falling back.
#[cfg(feature = "runtime")]
pub fn switcher_from_env<D: Discovery + ?Sized>(source: &D) -> Result<FrameDriver> {
    let parsed = SwitcherConfig::from_env_with_diagnostics();
    if !parsed.errors.is_empty() {
        return Err(Error::Config(parsed.errors));
    }
    Ok(switcher(source, parsed.config))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Completion, ElementHandle, ElementRef, Error, GroupId, LookupError, Result,
        ScrambleConfig, SlotId, VisualState,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{Discovery, FrameDriver, SelectionController, SwitcherConfig};

    pub use crate::{core, fx};
    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use vitrine_core as core;
pub use vitrine_fx as fx;
#[cfg(feature = "runtime")]
pub use vitrine_runtime as runtime;
