#![forbid(unsafe_code)]

//! Text effects for Vitrine.
//!
//! - **Scramble**: reveal a string position by position, cycling filler
//!   glyphs until each position settles on its final glyph.

pub mod scramble;

pub use scramble::{ScrambleConfig, ScrambleEffect, ScrambleHandle, ScrambleJob};
