#![forbid(unsafe_code)]

//! Tween primitives for show/hide transitions.
//!
//! A [`Tween`] interpolates a [`VisualState`] between two endpoints over a
//! duration, optionally after a delay, shaped by an [`EasingFn`]. Time is
//! tracked as [`Duration`] so repeated small ticks don't drift.

pub mod stagger;

use std::time::Duration;

use crate::element::VisualState;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Constant velocity.
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in.
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out.
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out.
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-in.
#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}

/// Cubic ease-out.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Named easings accepted by configuration.
pub const NAMED_EASINGS: &[(&str, EasingFn)] = &[
    ("linear", linear),
    ("ease-in", ease_in),
    ("ease-out", ease_out),
    ("ease-in-out", ease_in_out),
    ("ease-in-cubic", ease_in_cubic),
    ("ease-out-cubic", ease_out_cubic),
];

/// Look up an easing by name (case-insensitive, `_` and `-` interchangeable).
#[must_use]
pub fn easing_by_name(name: &str) -> Option<EasingFn> {
    let wanted = name.trim().to_ascii_lowercase().replace('_', "-");
    NAMED_EASINGS
        .iter()
        .find(|(n, _)| *n == wanted)
        .map(|(_, f)| *f)
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Interpolates a [`VisualState`] from `from` to `to`.
///
/// While running, the element is visible if either endpoint is visible, so
/// a hide stays rendered until its last frame and a show is rendered from its
/// first.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: VisualState,
    to: VisualState,
    delay: Duration,
    duration: Duration,
    elapsed: Duration,
    easing: EasingFn,
}

impl Tween {
    /// Tween between two states over `duration` with linear easing.
    ///
    /// A zero duration with no delay is complete immediately.
    #[must_use]
    pub fn new(from: VisualState, to: VisualState, duration: Duration) -> Self {
        Self {
            from,
            to,
            delay: Duration::ZERO,
            duration,
            elapsed: Duration::ZERO,
            easing: linear,
        }
    }

    /// Set the easing function.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Hold the `from` state for `delay` before interpolating.
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Delay plus duration.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.delay.saturating_add(self.duration)
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    #[must_use]
    pub fn raw_progress(&self) -> f32 {
        let active = self.elapsed.saturating_sub(self.delay);
        if self.duration.is_zero() {
            return if self.elapsed >= self.delay { 1.0 } else { 0.0 };
        }
        let t = active.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Interpolated state at the current time.
    #[must_use]
    pub fn state(&self) -> VisualState {
        if self.is_complete() {
            return self.to;
        }
        let t = (self.easing)(self.raw_progress());
        let opacity = self.from.opacity + (self.to.opacity - self.from.opacity) * t;
        let range = f32::from(self.to.offset) - f32::from(self.from.offset);
        let offset = (f32::from(self.from.offset) + range * t)
            .round()
            .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16;
        VisualState {
            opacity: opacity.clamp(0.0, 1.0),
            offset,
            visible: self.from.visible || self.to.visible,
        }
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.total()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
