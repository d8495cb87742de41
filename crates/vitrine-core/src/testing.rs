#![forbid(unsafe_code)]

//! Test doubles for [`ElementHandle`].
//!
//! Enabled for this crate's own tests and for downstream crates through the
//! `test-helpers` feature.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::element::{ElementHandle, ElementId, ElementRef, ScrambleCell, VisualState};

/// A mutation observed by a [`RecordingElement`].
#[derive(Debug, Clone, PartialEq)]
pub enum ElementWrite {
    /// `set_text` / `render_scramble` output.
    Text(String),
    /// `set_visual_state` argument.
    Visual(VisualState),
}

/// In-memory element that records every write.
#[derive(Debug)]
pub struct RecordingElement {
    id: ElementId,
    label: String,
    text: RefCell<String>,
    visual: Cell<VisualState>,
    writes: RefCell<Vec<ElementWrite>>,
    substitute_frames: Cell<usize>,
    subregions: RefCell<Vec<Rc<RecordingElement>>>,
}

impl RecordingElement {
    /// Create an element displaying `text`, initially shown.
    #[must_use]
    pub fn new(text: &str) -> Rc<Self> {
        Self::labeled("", text)
    }

    /// Create an element with a debug label.
    #[must_use]
    pub fn labeled(label: &str, text: &str) -> Rc<Self> {
        Rc::new(Self {
            id: ElementId::next(),
            label: label.to_string(),
            text: RefCell::new(text.to_string()),
            visual: Cell::new(VisualState::SHOWN),
            writes: RefCell::new(Vec::new()),
            substitute_frames: Cell::new(0),
            subregions: RefCell::new(Vec::new()),
        })
    }

    /// Attach sub-regions (as a text splitter would).
    pub fn set_subregions(&self, regions: Vec<Rc<RecordingElement>>) {
        *self.subregions.borrow_mut() = regions;
    }

    /// Attached sub-regions.
    #[must_use]
    pub fn parts(&self) -> Vec<Rc<RecordingElement>> {
        self.subregions.borrow().clone()
    }

    /// Debug label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Last applied visual state.
    #[must_use]
    pub fn visual(&self) -> VisualState {
        self.visual.get()
    }

    /// Whether the last applied visual state is visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visual.get().visible
    }

    /// All writes so far, oldest first.
    #[must_use]
    pub fn writes(&self) -> Vec<ElementWrite> {
        self.writes.borrow().clone()
    }

    /// Only the text writes, oldest first.
    #[must_use]
    pub fn text_writes(&self) -> Vec<String> {
        self.writes
            .borrow()
            .iter()
            .filter_map(|w| match w {
                ElementWrite::Text(t) => Some(t.clone()),
                ElementWrite::Visual(_) => None,
            })
            .collect()
    }

    /// Number of writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    /// Number of rendered scramble frames that contained a filler glyph.
    #[must_use]
    pub fn substitute_frames(&self) -> usize {
        self.substitute_frames.get()
    }

    /// Forget recorded writes (state is kept).
    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
        self.substitute_frames.set(0);
    }

    /// Upcast to a shared handle.
    #[must_use]
    pub fn handle(self: &Rc<Self>) -> ElementRef {
        Rc::clone(self) as ElementRef
    }
}

impl ElementHandle for RecordingElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text(&self, value: &str) {
        *self.text.borrow_mut() = value.to_string();
        self.writes
            .borrow_mut()
            .push(ElementWrite::Text(value.to_string()));
    }

    fn set_visual_state(&self, state: VisualState) {
        self.visual.set(state);
        self.writes.borrow_mut().push(ElementWrite::Visual(state));
    }

    fn subregions(&self) -> Vec<ElementRef> {
        self.subregions
            .borrow()
            .iter()
            .map(|r| Rc::clone(r) as ElementRef)
            .collect()
    }

    fn render_scramble(&self, cells: &[ScrambleCell<'_>]) {
        if cells.iter().any(ScrambleCell::is_substitute) {
            self.substitute_frames.set(self.substitute_frames.get() + 1);
        }
        let text: String = cells.iter().map(ScrambleCell::glyph).collect();
        self.set_text(&text);
    }
}
