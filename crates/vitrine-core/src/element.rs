#![forbid(unsafe_code)]

//! Element handle capability.
//!
//! The engine never touches a concrete visual surface. Everything it renders
//! goes through [`ElementHandle`], which a host (DOM bridge, terminal view,
//! test double) implements. Elements are passive: business logic never asks
//! an element whether it is visible.
//!
//! # Invariants
//!
//! 1. [`ElementId`]s are unique for the lifetime of the process.
//! 2. `set_text` / `set_visual_state` are the only mutations the engine makes.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocate a fresh, process-unique id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a host-provided id. Hosts that mint their own ids must keep them
    /// unique.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Visual properties the engine animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    /// Opacity in [0.0, 1.0].
    pub opacity: f32,
    /// Positional offset (host units, e.g. pixels or cells).
    pub offset: i16,
    /// Whether the element participates in rendering at all.
    pub visible: bool,
}

impl VisualState {
    /// Fully hidden: transparent, at rest, not rendered.
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        offset: 0,
        visible: false,
    };

    /// Fully shown at rest.
    pub const SHOWN: Self = Self {
        opacity: 1.0,
        offset: 0,
        visible: true,
    };

    /// Rendered but transparent, displaced by `offset`. Start of an entrance.
    #[must_use]
    pub const fn entering_from(offset: i16) -> Self {
        Self {
            opacity: 0.0,
            offset,
            visible: true,
        }
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::HIDDEN
    }
}

/// One position of a scramble frame, handed to [`ElementHandle::render_scramble`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrambleCell<'a> {
    /// Not started yet; still shows the old glyph.
    Pending(&'a str),
    /// In flight; shows a filler glyph.
    Substitute(&'a str),
    /// Final glyph; never reverts.
    Settled(&'a str),
}

impl<'a> ScrambleCell<'a> {
    /// The glyph to display for this position.
    #[must_use]
    pub fn glyph(&self) -> &'a str {
        match *self {
            Self::Pending(g) | Self::Substitute(g) | Self::Settled(g) => g,
        }
    }

    /// Whether this position shows a filler glyph.
    #[must_use]
    pub fn is_substitute(&self) -> bool {
        matches!(self, Self::Substitute(_))
    }
}

/// Capability interface for anything the engine can show, hide, or retext.
///
/// Methods take `&self`; hosts use interior mutability. All calls happen on
/// the frame-loop thread.
pub trait ElementHandle {
    /// Stable identity used for ownership and cancellation.
    fn id(&self) -> ElementId;

    /// Currently displayed text.
    fn text(&self) -> String;

    /// Replace the displayed text.
    fn set_text(&self, value: &str);

    /// Apply opacity, offset, and visibility.
    fn set_visual_state(&self, state: VisualState);

    /// Sub-regions (lines, characters) for staggered entrances.
    ///
    /// Provided by an external text-splitting capability; empty by default.
    fn subregions(&self) -> Vec<ElementRef> {
        Vec::new()
    }

    /// Render one scramble frame.
    ///
    /// The default joins the glyphs and calls [`set_text`](Self::set_text).
    /// Hosts that style filler glyphs differently override this.
    fn render_scramble(&self, cells: &[ScrambleCell<'_>]) {
        let text: String = cells.iter().map(ScrambleCell::glyph).collect();
        self.set_text(&text);
    }
}

/// Shared handle to an element.
pub type ElementRef = Rc<dyn ElementHandle>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingElement;

    #[test]
    fn ids_are_unique() {
        let a = ElementId::next();
        let b = ElementId::next();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn default_visual_state_is_hidden() {
        assert_eq!(VisualState::default(), VisualState::HIDDEN);
        assert!(!VisualState::HIDDEN.visible);
        assert!(VisualState::entering_from(12).visible);
    }

    #[test]
    fn render_scramble_joins_glyphs() {
        let el = RecordingElement::new("");
        el.render_scramble(&[
            ScrambleCell::Settled("a"),
            ScrambleCell::Substitute("#"),
            ScrambleCell::Pending("c"),
        ]);
        assert_eq!(el.text(), "a#c");
    }

    #[test]
    fn cell_glyph_accessors() {
        assert!(ScrambleCell::Substitute("x").is_substitute());
        assert!(!ScrambleCell::Settled("x").is_substitute());
        assert_eq!(ScrambleCell::Pending("é").glyph(), "é");
    }
}
