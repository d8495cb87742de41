#![forbid(unsafe_code)]

//! Completion signals and cancellation tokens.
//!
//! A [`completion`] pair splits into a [`Completer`] (held by whoever drives
//! the work) and a [`Completion`] (handed to whoever waits). The completion
//! settles exactly once, either resolved or cancelled. Later attempts to
//! settle it are ignored.
//!
//! [`CancelToken`] is the flag a frame-driven loop checks before each
//! mutation. Cancelling sets the flag; the loop observes it on its next tick.
//!
//! # Invariants
//!
//! 1. A completion transitions `Pending -> Resolved` or `Pending -> Cancelled`
//!    at most once.
//! 2. `resolve()` / `cancel()` after settlement return `false` and change
//!    nothing.
//! 3. A cancelled token never becomes un-cancelled.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    /// Create an un-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// How a completion settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The work ran to the end.
    Resolved,
    /// The work was superseded or cancelled before finishing.
    Cancelled,
}

#[derive(Debug, Default)]
struct Shared {
    outcome: Option<Outcome>,
    wakers: Vec<Waker>,
}

impl Shared {
    fn settle(&mut self, outcome: Outcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        for waker in self.wakers.drain(..) {
            waker.wake();
        }
        true
    }
}

/// Driving side of a completion.
#[derive(Debug)]
pub struct Completer {
    shared: Rc<RefCell<Shared>>,
}

impl Completer {
    /// Settle as resolved. Returns `true` if this call settled it.
    pub fn resolve(&self) -> bool {
        self.shared.borrow_mut().settle(Outcome::Resolved)
    }

    /// Settle as cancelled. Returns `true` if this call settled it.
    pub fn cancel(&self) -> bool {
        self.shared.borrow_mut().settle(Outcome::Cancelled)
    }

    /// Whether the completion has settled either way.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.shared.borrow().outcome.is_some()
    }
}

/// Waiting side of a completion. Cheap to clone; implements [`Future`].
#[derive(Debug, Clone)]
pub struct Completion {
    shared: Rc<RefCell<Shared>>,
}

impl Completion {
    /// A completion that is already resolved.
    #[must_use]
    pub fn resolved() -> Self {
        let (completer, completion) = completion();
        completer.resolve();
        completion
    }

    /// The outcome, if settled.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.shared.borrow().outcome
    }

    /// Whether the completion has settled either way.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.outcome().is_some()
    }

    /// Whether the completion resolved (ran to the end).
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.outcome() == Some(Outcome::Resolved)
    }

    /// Whether the completion was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.outcome() == Some(Outcome::Cancelled)
    }
}

impl Future for Completion {
    type Output = Outcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Outcome> {
        let mut shared = self.shared.borrow_mut();
        match shared.outcome {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                if !shared.wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    shared.wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

/// Create a linked completer/completion pair.
#[must_use]
pub fn completion() -> (Completer, Completion) {
    let shared = Rc::new(RefCell::new(Shared::default()));
    (
        Completer {
            shared: Rc::clone(&shared),
        },
        Completion { shared },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll_once(c: &mut Completion) -> Poll<Outcome> {
        let mut cx = Context::from_waker(Waker::noop());
        Pin::new(c).poll(&mut cx)
    }

    #[test]
    fn token_starts_clear_and_latches() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn resolves_exactly_once() {
        let (completer, completion) = completion();
        assert!(!completion.is_settled());
        assert!(completer.resolve());
        assert!(!completer.resolve());
        assert!(!completer.cancel());
        assert_eq!(completion.outcome(), Some(Outcome::Resolved));
    }

    #[test]
    fn cancel_then_resolve_is_ignored() {
        let (completer, completion) = completion();
        assert!(completer.cancel());
        assert!(!completer.resolve());
        assert!(completion.is_cancelled());
        assert!(!completion.is_resolved());
    }

    #[test]
    fn future_pending_until_settled() {
        let (completer, mut completion) = completion();
        assert_eq!(poll_once(&mut completion), Poll::Pending);
        completer.resolve();
        assert_eq!(poll_once(&mut completion), Poll::Ready(Outcome::Resolved));
    }

    #[test]
    fn clones_observe_same_outcome() {
        let (completer, completion) = completion();
        let other = completion.clone();
        completer.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn already_resolved_constructor() {
        let mut done = Completion::resolved();
        assert!(done.is_resolved());
        assert_eq!(poll_once(&mut done), Poll::Ready(Outcome::Resolved));
    }
}
