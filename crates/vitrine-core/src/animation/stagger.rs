#![forbid(unsafe_code)]

//! Stagger offsets for cascading entrances over sub-regions.
//!
//! # Invariants
//!
//! 1. `stagger_offsets(0, ..)` is empty.
//! 2. The first offset is always `Duration::ZERO`.
//! 3. Offsets never decrease.
//! 4. For `Linear`, offset[i] = i * step exactly (integer arithmetic).

use std::time::Duration;

use super::{EasingFn, ease_in, ease_out};

/// How to distribute delays across `count` items.
#[derive(Debug, Clone, Copy, Default)]
pub enum StaggerMode {
    /// offset[i] = i * step.
    #[default]
    Linear,
    /// Gaps grow toward the end.
    EaseIn,
    /// Gaps shrink toward the end.
    EaseOut,
    /// Any monotonic easing applied to the normalized index.
    Custom(EasingFn),
}

impl StaggerMode {
    /// Look up a built-in mode by name (`linear`, `ease-in`, `ease-out`;
    /// case-insensitive, `_` and `-` interchangeable).
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "linear" => Some(Self::Linear),
            "ease-in" => Some(Self::EaseIn),
            "ease-out" => Some(Self::EaseOut),
            _ => None,
        }
    }
}

/// Start delay for each of `count` items spaced by `step`.
///
/// The last item starts at `(count - 1) * step`; eased modes keep that span
/// and redistribute the items inside it.
#[must_use]
pub fn stagger_offsets(count: usize, step: Duration, mode: StaggerMode) -> Vec<Duration> {
    match count {
        0 => return Vec::new(),
        1 => return vec![Duration::ZERO],
        _ => {}
    }

    let easing: EasingFn = match mode {
        StaggerMode::Linear => {
            return (0..count)
                .map(|i| step.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
                .collect();
        }
        StaggerMode::EaseIn => ease_in,
        StaggerMode::EaseOut => ease_out,
        StaggerMode::Custom(f) => f,
    };

    let span = step.as_secs_f64() * (count - 1) as f64;
    let mut prev = Duration::ZERO;
    (0..count)
        .map(|i| {
            let t = i as f32 / (count - 1) as f32;
            let at = Duration::from_secs_f64(span * f64::from(easing(t).clamp(0.0, 1.0)));
            // Clamp so a non-monotonic custom easing cannot reorder items.
            prev = prev.max(at);
            prev
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_40: Duration = Duration::from_millis(40);

    #[test]
    fn empty_and_single() {
        assert!(stagger_offsets(0, MS_40, StaggerMode::Linear).is_empty());
        assert_eq!(
            stagger_offsets(1, MS_40, StaggerMode::EaseIn),
            vec![Duration::ZERO]
        );
    }

    #[test]
    fn linear_is_exact() {
        let offsets = stagger_offsets(4, MS_40, StaggerMode::Linear);
        assert_eq!(
            offsets,
            vec![
                Duration::ZERO,
                MS_40,
                Duration::from_millis(80),
                Duration::from_millis(120)
            ]
        );
    }

    #[test]
    fn eased_modes_keep_span() {
        for mode in [StaggerMode::EaseIn, StaggerMode::EaseOut] {
            let offsets = stagger_offsets(5, MS_40, mode);
            assert_eq!(offsets[0], Duration::ZERO);
            let last = offsets[4].as_secs_f64();
            assert!((last - 0.160).abs() < 1e-6, "{mode:?} span {last}");
        }
    }

    #[test]
    fn ease_in_gaps_grow() {
        let offsets = stagger_offsets(6, MS_40, StaggerMode::EaseIn);
        let gaps: Vec<Duration> = offsets.windows(2).map(|w| w[1] - w[0]).collect();
        for w in gaps.windows(2) {
            assert!(w[1] >= w[0], "gaps should grow: {gaps:?}");
        }
    }

    #[test]
    fn non_monotonic_custom_is_clamped() {
        let offsets = stagger_offsets(3, MS_40, StaggerMode::Custom(|t| 1.0 - t));
        for w in offsets.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn modes_by_name() {
        assert!(matches!(StaggerMode::by_name("Ease_In"), Some(StaggerMode::EaseIn)));
        assert!(matches!(StaggerMode::by_name(" linear "), Some(StaggerMode::Linear)));
        assert!(matches!(StaggerMode::by_name("ease-out"), Some(StaggerMode::EaseOut)));
        assert!(StaggerMode::by_name("bounce").is_none());
        assert!(matches!(StaggerMode::default(), StaggerMode::Linear));
    }

    #[test]
    fn zero_step_is_all_zero() {
        let offsets = stagger_offsets(5, Duration::ZERO, StaggerMode::EaseOut);
        assert!(offsets.iter().all(|d| d.is_zero()));
    }
}
