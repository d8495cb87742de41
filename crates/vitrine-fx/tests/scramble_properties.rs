#![forbid(unsafe_code)]

//! Property tests for the scramble effect.
//!
//! 1. Any old/new pair resolves to exactly the new text.
//! 2. With a fixed duration, resolution happens on frame `max(start) + D`.
//! 3. Writes stop once the completion has settled.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use vitrine_core::ElementHandle;
use vitrine_core::testing::RecordingElement;
use vitrine_fx::scramble::{ScrambleConfig, ScrambleEffect, ScrambleJob};

const MAX_FRAMES: usize = 10_000;

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["a", "B", "z", " ", "é", "e\u{301}", "漢", "🙂", "-"]),
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn resolves_to_exact_target(
        old in text_strategy(),
        new in text_strategy(),
        seed in any::<u64>(),
        spread in 0u32..30,
        min in 0u32..10,
        max in 0u32..30,
    ) {
        let el = RecordingElement::new(&old);
        let config = ScrambleConfig::default()
            .seed(seed)
            .start_spread(spread)
            .random_duration(min, max);
        let mut fx = ScrambleEffect::new(config);
        let handle = fx.set_text(&el.handle(), &new);
        let mut frames = 0;
        while !handle.is_settled() && frames < MAX_FRAMES {
            fx.tick();
            frames += 1;
        }
        prop_assert!(handle.is_resolved());
        prop_assert_eq!(el.text(), new);

        let writes = el.write_count();
        fx.tick();
        prop_assert_eq!(el.write_count(), writes);
    }

    #[test]
    fn fixed_duration_resolves_on_schedule(
        new in text_strategy(),
        seed in any::<u64>(),
        spread in 0u32..30,
        duration in 0u32..25,
    ) {
        let config = ScrambleConfig::default()
            .start_spread(spread)
            .fixed_duration(duration);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut job = ScrambleJob::plan("", &new, &config, &mut rng);
        let max_start = job.schedule().map(|(s, _)| s).max().unwrap_or(0);
        let glyphs = vec!["#".to_string(), "%".to_string()];
        while !job.step(&glyphs, 0.28, &mut rng) {
            job.advance();
        }
        if job.is_empty() {
            prop_assert_eq!(job.frame(), 0);
        } else {
            prop_assert_eq!(job.frame(), max_start + duration);
        }
    }
}
