#![forbid(unsafe_code)]

//! Transition timeline.
//!
//! A [`TransitionScheduler`] holds hide/show entries positioned on a clock
//! relative to the entries added before them. Each entry tweens its targets'
//! [`VisualState`] and, for shows, scrambles its text regions back to their
//! canonical text.
//!
//! # Usage
//!
//! ```ignore
//! let mut scheduler = TransitionScheduler::new(TransitionTiming::default(), ScrambleConfig::default());
//! scheduler.add(TransitionEntry::hide(old_roots));
//! let done = scheduler.add(TransitionEntry::show(new_roots).start(StartOffset::after_previous()));
//! while !done.is_settled() {
//!     scheduler.tick(frame_dt);
//! }
//! ```
//!
//! # Invariants
//!
//! 1. An entry never starts before the clock time at which it was added.
//! 2. Entries start in clock order; ties keep insertion order.
//! 3. A hide ends with `visible = false`; a show ends fully shown.
//! 4. After `cancel_all(e)` nothing scheduled so far writes to `e` again.
//!
//! # Failure Modes
//!
//! - Non-finite offsets are treated as zero.
//! - An entry with no targets and no reveals resolves on the tick it starts.

use std::fmt;
use std::time::Duration;

use vitrine_core::animation::stagger::{StaggerMode, stagger_offsets};
use vitrine_core::animation::{Animation, EasingFn, Tween, ease_out};
use vitrine_core::{
    Completer, Completion, ElementId, ElementRef, VisualState, completion,
};
use vitrine_fx::{ScrambleConfig, ScrambleEffect, ScrambleHandle};

// ---------------------------------------------------------------------------
// Offsets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    PreviousStart,
    PreviousEnd,
}

/// When an entry starts, relative to the entries added before it.
///
/// All constructors reduce to an anchor (the previous entry's start, or the
/// latest end among pending entries) plus a signed shift in seconds. The
/// resolved time is clamped so it is never earlier than the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartOffset {
    anchor: Anchor,
    shift: f64,
}

impl StartOffset {
    /// Start together with the previous entry.
    #[must_use]
    pub const fn immediately() -> Self {
        Self {
            anchor: Anchor::PreviousStart,
            shift: 0.0,
        }
    }

    /// Start once every previous entry has ended.
    #[must_use]
    pub const fn after_previous() -> Self {
        Self::relative(0.0)
    }

    /// Start `secs` before the previous entries end.
    #[must_use]
    pub fn before_previous_end(secs: f64) -> Self {
        Self::relative(-secs.abs())
    }

    /// Start `secs` after the previous entries end.
    #[must_use]
    pub fn gap(secs: f64) -> Self {
        Self::relative(secs.abs())
    }

    /// Start `secs` after (positive) or before (negative) the previous
    /// entries end.
    #[must_use]
    pub const fn relative(secs: f64) -> Self {
        Self {
            anchor: Anchor::PreviousEnd,
            shift: if secs.is_finite() { secs } else { 0.0 },
        }
    }

    fn resolve(self, previous_start: Duration, previous_end: Duration, now: Duration) -> Duration {
        let anchor = match self.anchor {
            Anchor::PreviousStart => previous_start,
            Anchor::PreviousEnd => previous_end,
        };
        let shift = Duration::try_from_secs_f64(self.shift.abs()).unwrap_or(Duration::ZERO);
        let at = if self.shift >= 0.0 {
            anchor.saturating_add(shift)
        } else {
            anchor.saturating_sub(shift)
        };
        at.max(now)
    }
}

impl Default for StartOffset {
    fn default() -> Self {
        Self::after_previous()
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// What an entry does to its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAction {
    /// Fade out, then stop rendering.
    Hide,
    /// Start rendering transparent, then fade in.
    Show,
}

/// Tween settings shared by every entry in a scheduler.
#[derive(Debug, Clone, Copy)]
pub struct TransitionTiming {
    pub exit: Duration,
    pub enter: Duration,
    pub easing: EasingFn,
    /// Displacement a show starts from.
    pub enter_offset: i16,
    /// Delay between consecutive sub-regions of a show target.
    pub stagger: Duration,
    /// How sub-region delays are spread across the stagger span.
    pub stagger_mode: StaggerMode,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            exit: Duration::from_millis(300),
            enter: Duration::from_millis(300),
            easing: ease_out,
            enter_offset: 0,
            stagger: Duration::ZERO,
            stagger_mode: StaggerMode::Linear,
        }
    }
}

#[derive(Clone)]
struct Reveal {
    element: ElementRef,
    text: String,
    handle: Option<ScrambleHandle>,
}

/// A hide or show request, before it is placed on the timeline.
#[derive(Clone)]
pub struct TransitionEntry {
    action: TransitionAction,
    targets: Vec<ElementRef>,
    start: StartOffset,
    duration: Option<Duration>,
    reveals: Vec<Reveal>,
}

impl TransitionEntry {
    #[must_use]
    pub fn hide(targets: Vec<ElementRef>) -> Self {
        Self::new(TransitionAction::Hide, targets)
    }

    #[must_use]
    pub fn show(targets: Vec<ElementRef>) -> Self {
        Self::new(TransitionAction::Show, targets)
    }

    #[must_use]
    pub fn new(action: TransitionAction, targets: Vec<ElementRef>) -> Self {
        Self {
            action,
            targets,
            start: StartOffset::default(),
            duration: None,
            reveals: Vec::new(),
        }
    }

    /// Position relative to the previous entries.
    #[must_use]
    pub fn start(mut self, offset: StartOffset) -> Self {
        self.start = offset;
        self
    }

    /// Override the scheduler's exit/enter duration.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Scramble `element` to `text` when the entry starts.
    #[must_use]
    pub fn with_reveal(mut self, element: ElementRef, text: impl Into<String>) -> Self {
        self.reveals.push(Reveal {
            element,
            text: text.into(),
            handle: None,
        });
        self
    }

    #[must_use]
    pub fn action(&self) -> TransitionAction {
        self.action
    }
}

impl fmt::Debug for TransitionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionEntry")
            .field("action", &self.action)
            .field("targets", &self.targets.len())
            .field("start", &self.start)
            .field("duration", &self.duration)
            .field("reveals", &self.reveals.len())
            .finish()
    }
}

struct Track {
    element: ElementRef,
    /// The target this track belongs to (itself, or the parent of a
    /// sub-region).
    owner: ElementId,
    tween: Tween,
}

struct Scheduled {
    action: TransitionAction,
    start_at: Duration,
    end_at: Duration,
    started: bool,
    elapsed: Duration,
    tracks: Vec<Track>,
    reveals: Vec<Reveal>,
    completer: Completer,
}

impl Scheduled {
    fn is_done(&self) -> bool {
        self.tracks.iter().all(|t| t.tween.is_complete())
            && self
                .reveals
                .iter()
                .all(|r| r.handle.as_ref().is_none_or(ScrambleHandle::is_settled))
    }

    fn touches(&self, element: ElementId) -> bool {
        self.tracks
            .iter()
            .any(|t| t.owner == element || t.element.id() == element)
            || self.reveals.iter().any(|r| r.element.id() == element)
    }
}

impl fmt::Debug for Scheduled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduled")
            .field("action", &self.action)
            .field("start_at", &self.start_at)
            .field("end_at", &self.end_at)
            .field("started", &self.started)
            .field("tracks", &self.tracks.len())
            .field("reveals", &self.reveals.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Clocked list of transition entries plus the scramble driver their
/// reveals run on.
pub struct TransitionScheduler {
    timing: TransitionTiming,
    now: Duration,
    entries: Vec<Scheduled>,
    scramble: ScrambleEffect,
}

impl fmt::Debug for TransitionScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionScheduler")
            .field("now", &self.now)
            .field("entries", &self.entries)
            .field("scramble", &self.scramble)
            .finish()
    }
}

impl TransitionScheduler {
    #[must_use]
    pub fn new(timing: TransitionTiming, scramble: ScrambleConfig) -> Self {
        Self {
            timing,
            now: Duration::ZERO,
            entries: Vec::new(),
            scramble: ScrambleEffect::new(scramble),
        }
    }

    #[must_use]
    pub fn timing(&self) -> &TransitionTiming {
        &self.timing
    }

    /// Scheduler clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Entries not yet finished.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Nothing scheduled and no scramble running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.entries.is_empty() && self.scramble.active_count() == 0
    }

    /// Place `entry` on the timeline. The returned completion resolves when
    /// its tweens finish and its reveals resolve, or reports cancellation.
    pub fn add(&mut self, entry: TransitionEntry) -> Completion {
        let previous_start = self.entries.last().map_or(self.now, |e| e.start_at);
        let previous_end = self
            .entries
            .iter()
            .map(|e| e.end_at)
            .max()
            .unwrap_or(self.now);
        let start_at = entry.start.resolve(previous_start, previous_end, self.now);

        let timing = self.timing;
        let duration = entry.duration.unwrap_or(match entry.action {
            TransitionAction::Hide => timing.exit,
            TransitionAction::Show => timing.enter,
        });

        let mut tracks = Vec::new();
        let mut span = duration;
        for target in entry.targets {
            let owner = target.id();
            match entry.action {
                TransitionAction::Hide => tracks.push(Track {
                    element: target,
                    owner,
                    tween: Tween::new(VisualState::SHOWN, VisualState::HIDDEN, duration)
                        .easing(timing.easing),
                }),
                TransitionAction::Show => {
                    let subregions = if timing.stagger.is_zero() {
                        Vec::new()
                    } else {
                        target.subregions()
                    };
                    tracks.push(Track {
                        element: target,
                        owner,
                        tween: show_tween(timing, duration, Duration::ZERO),
                    });
                    let offsets =
                        stagger_offsets(subregions.len(), timing.stagger, timing.stagger_mode);
                    for (region, delay) in subregions.into_iter().zip(offsets) {
                        span = span.max(duration.saturating_add(delay));
                        tracks.push(Track {
                            element: region,
                            owner,
                            tween: show_tween(timing, duration, delay),
                        });
                    }
                }
            }
        }

        let (completer, done) = completion();
        tracing::debug!(
            action = ?entry.action,
            start_ms = start_at.as_millis() as u64,
            duration_ms = duration.as_millis() as u64,
            tracks = tracks.len(),
            reveals = entry.reveals.len(),
            "transition scheduled"
        );
        self.entries.push(Scheduled {
            action: entry.action,
            start_at,
            end_at: start_at.saturating_add(span),
            started: false,
            elapsed: Duration::ZERO,
            tracks,
            reveals: entry.reveals,
            completer,
        });
        done
    }

    /// Advance the clock by `dt` and render one frame.
    pub fn tick(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
        self.scramble.tick();

        let now = self.now;
        let scramble = &mut self.scramble;
        for entry in &mut self.entries {
            if !entry.started {
                if entry.start_at > now {
                    continue;
                }
                entry.started = true;
                tracing::trace!(action = ?entry.action, "transition started");
                if entry.action == TransitionAction::Show {
                    for reveal in &mut entry.reveals {
                        show_untracked(&entry.tracks, &reveal.element);
                        for part in reveal.element.subregions() {
                            show_untracked(&entry.tracks, &part);
                        }
                        reveal.handle = Some(scramble.set_text(&reveal.element, &reveal.text));
                    }
                }
            }

            let elapsed = now.saturating_sub(entry.start_at);
            let delta = elapsed.saturating_sub(entry.elapsed);
            entry.elapsed = elapsed;
            for track in &mut entry.tracks {
                track.tween.tick(delta);
                track.element.set_visual_state(track.tween.state());
            }
        }

        self.entries.retain(|entry| {
            if entry.started && entry.is_done() {
                entry.completer.resolve();
                tracing::trace!(action = ?entry.action, "transition finished");
                false
            } else {
                true
            }
        });
    }

    /// Stop everything scheduled for `element`.
    ///
    /// Removes it (and its sub-regions) from every entry, cancels its scramble
    /// and restores its canonical text if it was being revealed, then snaps it
    /// hidden. Affected entries report [`Outcome::Cancelled`]. Returns the
    /// number of affected entries.
    ///
    /// [`Outcome::Cancelled`]: vitrine_core::Outcome::Cancelled
    pub fn cancel_all(&mut self, element: &ElementRef) -> usize {
        let id = element.id();
        self.scramble.cancel(id);

        let mut affected = 0;
        for entry in &mut self.entries {
            if !entry.touches(id) {
                continue;
            }
            affected += 1;
            entry.completer.cancel();
            entry
                .tracks
                .retain(|t| t.owner != id && t.element.id() != id);
            entry.reveals.retain(|r| {
                if r.element.id() != id {
                    return true;
                }
                if let Some(handle) = &r.handle {
                    handle.cancel();
                }
                r.element.set_text(&r.text);
                false
            });
        }
        self.entries
            .retain(|e| !e.tracks.is_empty() || !e.reveals.is_empty());

        element.set_visual_state(VisualState::HIDDEN);
        for region in element.subregions() {
            region.set_visual_state(VisualState::HIDDEN);
        }
        tracing::debug!(element = id.raw(), affected, "transitions cancelled");
        affected
    }
}

/// Show `element` at rest unless one of `tracks` animates it.
fn show_untracked(tracks: &[Track], element: &ElementRef) {
    let id = element.id();
    if !tracks.iter().any(|t| t.element.id() == id) {
        element.set_visual_state(VisualState::SHOWN);
    }
}

fn show_tween(timing: TransitionTiming, duration: Duration, delay: Duration) -> Tween {
    Tween::new(
        VisualState::entering_from(timing.enter_offset),
        VisualState::SHOWN,
        duration,
    )
    .easing(timing.easing)
    .delay(delay)
}
