#![forbid(unsafe_code)]

//! Property tests for the transition scheduler.
//!
//! 1. A show placed with `relative(secs)` after a hide starts no earlier than
//!    `exit + secs` (clamped at zero) and both end in their terminal states.
//! 2. After `cancel_all`, nothing scheduled so far writes to the element.

use std::time::Duration;

use proptest::prelude::*;
use vitrine_core::VisualState;
use vitrine_core::testing::RecordingElement;
use vitrine_fx::ScrambleConfig;
use vitrine_runtime::{StartOffset, TransitionEntry, TransitionScheduler, TransitionTiming};

const MS_10: Duration = Duration::from_millis(10);

fn timing(exit_ms: u64, enter_ms: u64) -> TransitionTiming {
    TransitionTiming {
        exit: Duration::from_millis(exit_ms),
        enter: Duration::from_millis(enter_ms),
        ..TransitionTiming::default()
    }
}

proptest! {
    #[test]
    fn relative_show_respects_offset(
        exit_ms in 0u64..400,
        enter_ms in 0u64..400,
        shift_ms in -500i64..500,
    ) {
        let old = RecordingElement::new("");
        let new = RecordingElement::new("");
        let mut s = TransitionScheduler::new(timing(exit_ms, enter_ms), ScrambleConfig::default().seed(1));
        s.add(TransitionEntry::hide(vec![old.handle()]));
        let done = s.add(
            TransitionEntry::show(vec![new.handle()])
                .start(StartOffset::relative(shift_ms as f64 / 1000.0)),
        );
        let expected = (exit_ms as i64 + shift_ms).max(0) as u64;

        let mut first_write = None;
        for frame in 1..=200u64 {
            s.tick(MS_10);
            if first_write.is_none() && new.write_count() > 0 {
                first_write = Some(frame * 10);
            }
            if s.is_idle() {
                break;
            }
        }
        prop_assert!(s.is_idle());
        prop_assert!(done.is_resolved());
        let started = first_write.unwrap_or(0);
        prop_assert!(started >= expected, "started {} < {}", started, expected);
        prop_assert!(started <= expected + 10, "started {} too late for {}", started, expected);
        prop_assert_eq!(old.visual(), VisualState::HIDDEN);
        prop_assert_eq!(new.visual(), VisualState::SHOWN);
    }

    #[test]
    fn cancel_all_silences_element(
        cancel_after in 0usize..40,
        with_reveal in any::<bool>(),
    ) {
        let root = RecordingElement::new("");
        let title = RecordingElement::new("Heading");
        let mut s = TransitionScheduler::new(
            timing(300, 300),
            ScrambleConfig::default().seed(2),
        );
        s.add(TransitionEntry::hide(vec![root.handle()]));
        let mut show = TransitionEntry::show(vec![root.handle()]);
        if with_reveal {
            show = show.with_reveal(title.handle(), "Heading");
        }
        let done = s.add(show);
        for _ in 0..cancel_after {
            s.tick(MS_10);
        }

        s.cancel_all(&root.handle());
        s.cancel_all(&title.handle());
        prop_assert_eq!(root.visual(), VisualState::HIDDEN);
        prop_assert!(done.is_settled());
        let root_writes = root.write_count();
        let title_writes = title.write_count();
        for _ in 0..100 {
            s.tick(MS_10);
        }
        prop_assert_eq!(root.write_count(), root_writes);
        prop_assert_eq!(title.write_count(), title_writes);
        let title_writes = title.text_writes();
        prop_assert_eq!(title_writes.last().map(String::as_str).unwrap_or("Heading"), "Heading");
    }
}
