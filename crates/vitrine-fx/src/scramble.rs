#![forbid(unsafe_code)]

//! Scramble text reveal.
//!
//! [`ScrambleEffect::set_text`] animates an element's displayed text from
//! whatever it shows now to a new string. Each position (grapheme cluster)
//! gets a random start frame and an end frame; between the two it shows
//! filler glyphs drawn from the configured glyph set, rerolled with a fixed
//! probability each frame.
//!
//! # Usage
//!
//! ```ignore
//! use vitrine_fx::scramble::{ScrambleConfig, ScrambleEffect};
//!
//! let mut fx = ScrambleEffect::new(ScrambleConfig::default().seed(7));
//! let handle = fx.set_text(&element, "Hello");
//! while !handle.is_settled() {
//!     fx.tick(); // once per display refresh
//! }
//! ```
//!
//! # Invariants
//!
//! 1. A job's frame counter never decreases.
//! 2. A settled position never shows a filler glyph again.
//! 3. At most one job drives a given element; `set_text` cancels the previous
//!    job before touching the element.
//! 4. The completion resolves exactly once, on the frame where every
//!    position has settled, and the element then shows the new text exactly.
//!
//! # Failure Modes
//!
//! None. Empty target text is valid and resolves once the old glyphs have
//! cleared. An empty glyph set falls back to showing the old glyph while a
//! position is in flight.

use std::future::IntoFuture;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use unicode_segmentation::UnicodeSegmentation;
use vitrine_core::animation::EasingFn;
use vitrine_core::{
    CancelToken, Completer, Completion, ElementId, ElementRef, Outcome, ScrambleCell, completion,
};

/// Filler glyphs used when none are configured.
pub const DEFAULT_GLYPHS: &str = "!<>-_\\/[]{}—=+*^?#________";

/// Chance per frame that an in-flight position picks a new filler glyph.
pub const DEFAULT_REROLL_PROBABILITY: f64 = 0.28;

/// Default exclusive upper bound for a position's start frame.
pub const DEFAULT_START_SPREAD: u32 = 20;

/// Default exclusive upper bound for a position's random duration.
pub const DEFAULT_SPEED_MAX: u32 = 20;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Scramble timing and glyph configuration.
///
/// Durations are in frames. When `speed_min >= speed_max` every position
/// runs exactly `speed_min` frames (constant-duration variant); otherwise each
/// draws its duration from `[speed_min, speed_max)`.
#[derive(Debug, Clone)]
pub struct ScrambleConfig {
    /// Filler glyph pool (split into grapheme clusters).
    pub glyphs: String,
    /// Start frames are drawn from `[0, start_spread)`.
    pub start_spread: u32,
    /// Lower duration bound, or the fixed duration.
    pub speed_min: u32,
    /// Exclusive upper duration bound.
    pub speed_max: u32,
    /// Per-frame reroll chance in [0, 1].
    pub reroll_probability: f64,
    /// Applied to a position's progress; reaching 1.0 settles it early.
    pub easing: Option<EasingFn>,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_GLYPHS.to_string(),
            start_spread: DEFAULT_START_SPREAD,
            speed_min: 0,
            speed_max: DEFAULT_SPEED_MAX,
            reroll_probability: DEFAULT_REROLL_PROBABILITY,
            easing: None,
            seed: None,
        }
    }
}

impl ScrambleConfig {
    /// Set the filler glyph pool.
    #[must_use]
    pub fn glyphs(mut self, glyphs: impl Into<String>) -> Self {
        self.glyphs = glyphs.into();
        self
    }

    /// Set the exclusive start-frame bound.
    #[must_use]
    pub fn start_spread(mut self, frames: u32) -> Self {
        self.start_spread = frames;
        self
    }

    /// Draw each position's duration from `[min, max)`.
    #[must_use]
    pub fn random_duration(mut self, min: u32, max: u32) -> Self {
        self.speed_min = min;
        self.speed_max = max;
        self
    }

    /// Give every position the same duration.
    #[must_use]
    pub fn fixed_duration(mut self, frames: u32) -> Self {
        self.speed_min = frames;
        self.speed_max = frames;
        self
    }

    /// Set the per-frame reroll chance (clamped to [0, 1]).
    #[must_use]
    pub fn reroll_probability(mut self, p: f64) -> Self {
        self.reroll_probability = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
        self
    }

    /// Set the early-settle easing.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Seed the RNG.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether every position runs the same number of frames.
    #[must_use]
    pub fn is_fixed_duration(&self) -> bool {
        self.speed_min >= self.speed_max
    }

    fn draw_duration<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.is_fixed_duration() {
            self.speed_min
        } else {
            rng.random_range(self.speed_min..self.speed_max)
        }
    }

    fn draw_start<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.start_spread == 0 {
            0
        } else {
            rng.random_range(0..self.start_spread)
        }
    }
}

/// Split text into display positions.
fn positions(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Position {
    from: String,
    to: String,
    start: u32,
    end: u32,
    substitute: Option<String>,
    settled: bool,
}

impl Position {
    fn eased_done(&self, frame: u32, easing: Option<EasingFn>) -> bool {
        let Some(easing) = easing else {
            return false;
        };
        if frame < self.start || self.end <= self.start {
            return false;
        }
        let t = (frame - self.start) as f32 / (self.end - self.start) as f32;
        easing(t) >= 1.0
    }
}

/// Per-element scramble schedule and progress.
#[derive(Debug, Clone)]
pub struct ScrambleJob {
    positions: Vec<Position>,
    frame: u32,
    resolved: bool,
    easing: Option<EasingFn>,
}

impl ScrambleJob {
    /// Plan a job from `old` to `new`.
    pub fn plan<R: Rng + ?Sized>(
        old: &str,
        new: &str,
        config: &ScrambleConfig,
        rng: &mut R,
    ) -> Self {
        let old = positions(old);
        let new = positions(new);
        let len = old.len().max(new.len());
        let positions = (0..len)
            .map(|i| {
                let start = config.draw_start(rng);
                let end = start.saturating_add(config.draw_duration(rng));
                Position {
                    from: old.get(i).copied().unwrap_or_default().to_string(),
                    to: new.get(i).copied().unwrap_or_default().to_string(),
                    start,
                    end,
                    substitute: None,
                    settled: false,
                }
            })
            .collect();
        Self {
            positions,
            frame: 0,
            resolved: false,
            easing: config.easing,
        }
    }

    /// Current frame.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether there are no positions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether every position has settled.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// `(start, end)` frame per position.
    pub fn schedule(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.positions.iter().map(|p| (p.start, p.end))
    }

    /// Frame on which the last position reaches its end (ignores early
    /// settling by easing).
    #[must_use]
    pub fn completion_frame(&self) -> u32 {
        self.positions.iter().map(|p| p.end).max().unwrap_or(0)
    }

    /// The text shown once resolved.
    #[must_use]
    pub fn target(&self) -> String {
        self.positions.iter().map(|p| p.to.as_str()).collect()
    }

    /// Settle or reroll every position for the current frame.
    ///
    /// Returns `true` once every position has settled.
    pub fn step<R: Rng + ?Sized>(&mut self, glyphs: &[String], reroll: f64, rng: &mut R) -> bool {
        let frame = self.frame;
        let easing = self.easing;
        let mut complete = 0;
        for pos in &mut self.positions {
            if !pos.settled && (frame >= pos.end || pos.eased_done(frame, easing)) {
                pos.settled = true;
                pos.substitute = None;
            }
            if pos.settled {
                complete += 1;
            } else if frame >= pos.start
                && (pos.substitute.is_none() || rng.random::<f64>() < reroll)
            {
                pos.substitute = Some(if glyphs.is_empty() {
                    pos.from.clone()
                } else {
                    glyphs[rng.random_range(0..glyphs.len())].clone()
                });
            }
        }
        self.resolved = complete == self.positions.len();
        self.resolved
    }

    /// Cells for the current frame.
    #[must_use]
    pub fn cells(&self) -> Vec<ScrambleCell<'_>> {
        let frame = self.frame;
        self.positions
            .iter()
            .map(|p| {
                if p.settled {
                    ScrambleCell::Settled(&p.to)
                } else if frame >= p.start {
                    ScrambleCell::Substitute(p.substitute.as_deref().unwrap_or(&p.from))
                } else {
                    ScrambleCell::Pending(&p.from)
                }
            })
            .collect()
    }

    /// Move to the next frame.
    pub fn advance(&mut self) {
        self.frame = self.frame.saturating_add(1);
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Caller's view of a running scramble: await it or cancel it.
#[derive(Debug, Clone)]
pub struct ScrambleHandle {
    element: ElementId,
    token: CancelToken,
    completion: Completion,
}

impl ScrambleHandle {
    /// Element this job drives.
    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Completion signal (resolves once, or reports cancellation).
    #[must_use]
    pub fn completion(&self) -> Completion {
        self.completion.clone()
    }

    /// Stop the job. The effect observes this before its next mutation.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the job finished either way.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.completion.is_settled() || self.token.is_cancelled()
    }

    /// Whether the job ran to the end.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.completion.is_resolved()
    }
}

impl IntoFuture for ScrambleHandle {
    type Output = Outcome;
    type IntoFuture = Completion;

    fn into_future(self) -> Completion {
        self.completion
    }
}

// ---------------------------------------------------------------------------
// Effect driver
// ---------------------------------------------------------------------------

struct ActiveJob {
    id: ElementId,
    element: ElementRef,
    job: ScrambleJob,
    token: CancelToken,
    completer: Completer,
}

impl std::fmt::Debug for ActiveJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveJob")
            .field("element", &self.id)
            .field("frame", &self.job.frame())
            .field("positions", &self.job.len())
            .finish()
    }
}

/// Drives scramble jobs for any number of elements, one frame per tick.
pub struct ScrambleEffect {
    config: ScrambleConfig,
    glyphs: Vec<String>,
    rng: StdRng,
    jobs: Vec<ActiveJob>,
}

impl std::fmt::Debug for ScrambleEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrambleEffect")
            .field("glyphs", &self.glyphs.len())
            .field("active", &self.jobs)
            .finish()
    }
}

impl ScrambleEffect {
    /// Create an effect driver.
    #[must_use]
    pub fn new(config: ScrambleConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let glyphs = positions(&config.glyphs)
            .into_iter()
            .map(str::to_string)
            .collect();
        Self {
            config,
            glyphs,
            rng,
            jobs: Vec::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ScrambleConfig {
        &self.config
    }

    /// Start scrambling `element` toward `new_text`.
    ///
    /// Any job already driving the element is cancelled first. Frame 0 is
    /// rendered before this returns.
    pub fn set_text(&mut self, element: &ElementRef, new_text: &str) -> ScrambleHandle {
        let id = element.id();
        if self.cancel(id) {
            tracing::debug!(element = id.raw(), "scramble superseded");
        }

        let old = element.text();
        let mut job = ScrambleJob::plan(&old, new_text, &self.config, &mut self.rng);
        let (completer, completion) = completion();
        let token = CancelToken::new();
        let handle = ScrambleHandle {
            element: id,
            token: token.clone(),
            completion,
        };

        tracing::trace!(
            element = id.raw(),
            positions = job.len(),
            completion_frame = job.completion_frame(),
            "scramble started"
        );

        let done = job.step(&self.glyphs, self.config.reroll_probability, &mut self.rng);
        element.render_scramble(&job.cells());
        if done {
            completer.resolve();
            return handle;
        }
        job.advance();
        self.jobs.push(ActiveJob {
            id,
            element: Rc::clone(element),
            job,
            token,
            completer,
        });
        handle
    }

    /// Render the next frame of every active job.
    pub fn tick(&mut self) {
        let glyphs = &self.glyphs;
        let reroll = self.config.reroll_probability;
        let rng = &mut self.rng;
        self.jobs.retain_mut(|active| {
            if active.token.is_cancelled() {
                active.completer.cancel();
                tracing::trace!(element = active.id.raw(), "scramble cancelled");
                return false;
            }
            let done = active.job.step(glyphs, reroll, rng);
            active.element.render_scramble(&active.job.cells());
            if done {
                active.completer.resolve();
                tracing::trace!(
                    element = active.id.raw(),
                    frame = active.job.frame(),
                    "scramble resolved"
                );
                return false;
            }
            active.job.advance();
            true
        });
    }

    /// Cancel the job driving `element`, if any. Its completion reports
    /// [`Outcome::Cancelled`] and it makes no further writes.
    pub fn cancel(&mut self, element: ElementId) -> bool {
        let Some(idx) = self.jobs.iter().position(|j| j.id == element) else {
            return false;
        };
        let active = self.jobs.remove(idx);
        active.token.cancel();
        active.completer.cancel();
        true
    }

    /// Cancel every active job.
    pub fn cancel_all(&mut self) {
        for active in self.jobs.drain(..) {
            active.token.cancel();
            active.completer.cancel();
        }
    }

    /// Whether a job is driving `element`.
    #[must_use]
    pub fn is_active(&self, element: ElementId) -> bool {
        self.jobs
            .iter()
            .any(|j| j.id == element && !j.token.is_cancelled())
    }

    /// Number of jobs still scheduled (including ones cancelled through a
    /// handle but not yet observed).
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.jobs.len()
    }

    /// Frame of the job driving `element`.
    #[must_use]
    pub fn frame_of(&self, element: ElementId) -> Option<u32> {
        self.jobs
            .iter()
            .find(|j| j.id == element)
            .map(|j| j.job.frame())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
