#![forbid(unsafe_code)]

//! Property tests for tweens and stagger offsets.
//!
//! 1. Tween opacity stays within [0, 1] for any tick sequence.
//! 2. Show tweens never lose opacity over time with monotonic easings.
//! 3. A tween is complete exactly once its accumulated time reaches the total.
//! 4. Stagger offsets are non-decreasing and start at zero.

use std::time::Duration;

use proptest::prelude::*;
use vitrine_core::VisualState;
use vitrine_core::animation::stagger::{StaggerMode, stagger_offsets};
use vitrine_core::animation::{Animation, NAMED_EASINGS, Tween};

fn ticks_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..80, 1..40)
}

proptest! {
    #[test]
    fn opacity_bounded(ticks in ticks_strategy(), duration in 0u64..1_000, easing_idx in 0usize..6) {
        let (_, easing) = NAMED_EASINGS[easing_idx];
        let mut tween = Tween::new(
            VisualState::entering_from(-30),
            VisualState::SHOWN,
            Duration::from_millis(duration),
        )
        .easing(easing);
        for ms in ticks {
            tween.tick(Duration::from_millis(ms));
            let s = tween.state();
            prop_assert!((0.0..=1.0).contains(&s.opacity), "opacity {}", s.opacity);
            prop_assert!(s.visible);
        }
    }

    #[test]
    fn show_opacity_monotonic(ticks in ticks_strategy(), easing_idx in 0usize..6) {
        let (name, easing) = NAMED_EASINGS[easing_idx];
        let mut tween = Tween::new(
            VisualState::entering_from(0),
            VisualState::SHOWN,
            Duration::from_millis(500),
        )
        .easing(easing);
        let mut prev = tween.state().opacity;
        for ms in ticks {
            tween.tick(Duration::from_millis(ms));
            let now = tween.state().opacity;
            prop_assert!(now + 1e-4 >= prev, "{} went backwards: {} -> {}", name, prev, now);
            prev = now;
        }
    }

    #[test]
    fn completes_at_total(ticks in ticks_strategy(), delay in 0u64..200, duration in 0u64..500) {
        let mut tween = Tween::new(VisualState::SHOWN, VisualState::HIDDEN, Duration::from_millis(duration))
            .delay(Duration::from_millis(delay));
        let mut elapsed = 0u64;
        for ms in ticks {
            tween.tick(Duration::from_millis(ms));
            elapsed += ms;
            prop_assert_eq!(tween.is_complete(), elapsed >= delay + duration);
        }
    }

    #[test]
    fn stagger_non_decreasing(count in 0usize..50, step in 0u64..100, mode_idx in 0usize..3) {
        let mode = [StaggerMode::Linear, StaggerMode::EaseIn, StaggerMode::EaseOut][mode_idx];
        let offsets = stagger_offsets(count, Duration::from_millis(step), mode);
        prop_assert_eq!(offsets.len(), count);
        if let Some(first) = offsets.first() {
            prop_assert_eq!(*first, Duration::ZERO);
        }
        for w in offsets.windows(2) {
            prop_assert!(w[1] >= w[0]);
        }
    }
}
