#![forbid(unsafe_code)]

//! Switcher configuration.
//!
//! Deterministic defaults, overridable through `VITRINE_*` environment
//! variables. Parsing never fails: a bad value keeps the default and is
//! reported in [`SwitcherConfigParse::errors`].
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `VITRINE_EXIT_DURATION_SECS` | hide tween length | 0.3 |
//! | `VITRINE_ENTER_DURATION_SECS` | show tween length | 0.3 |
//! | `VITRINE_OVERLAP_SECS` | 0 sequential, >0 gap, <0 enter overlaps exit end | 0 |
//! | `VITRINE_ENTER_OFFSET` | entrance displacement (host units) | 0 |
//! | `VITRINE_ENTER_STAGGER_SECS` | delay between sub-region entrances | 0 |
//! | `VITRINE_ENTER_STAGGER_MODE` | linear, ease-in, ease-out | linear |
//! | `VITRINE_EASING` | tween easing name | ease-out |
//! | `VITRINE_SCRAMBLE` | scramble text regions on enter | true |
//! | `VITRINE_GLYPH_SET` | filler glyphs | built-in set |
//! | `VITRINE_SCRAMBLE_SPEED_MIN` / `_MAX` | per-position duration bounds (frames) | 0 / 20 |
//! | `VITRINE_SCRAMBLE_START_SPREAD` | start-frame bound | 20 |
//! | `VITRINE_SCRAMBLE_REROLL` | per-frame reroll chance | 0.28 |
//! | `VITRINE_SCRAMBLE_SEED` | fixed RNG seed | unset |

use std::env;
use std::fmt;
use std::time::Duration;

use vitrine_core::animation::stagger::StaggerMode;
use vitrine_core::animation::{EasingFn, NAMED_EASINGS, ease_out, easing_by_name};
use vitrine_fx::ScrambleConfig;

use crate::scheduler::{StartOffset, TransitionTiming};

pub const ENV_EXIT_DURATION: &str = "VITRINE_EXIT_DURATION_SECS";
pub const ENV_ENTER_DURATION: &str = "VITRINE_ENTER_DURATION_SECS";
pub const ENV_OVERLAP: &str = "VITRINE_OVERLAP_SECS";
pub const ENV_ENTER_OFFSET: &str = "VITRINE_ENTER_OFFSET";
pub const ENV_ENTER_STAGGER: &str = "VITRINE_ENTER_STAGGER_SECS";
pub const ENV_ENTER_STAGGER_MODE: &str = "VITRINE_ENTER_STAGGER_MODE";
pub const ENV_EASING: &str = "VITRINE_EASING";
pub const ENV_SCRAMBLE: &str = "VITRINE_SCRAMBLE";
pub const ENV_GLYPH_SET: &str = "VITRINE_GLYPH_SET";
pub const ENV_SCRAMBLE_SPEED_MIN: &str = "VITRINE_SCRAMBLE_SPEED_MIN";
pub const ENV_SCRAMBLE_SPEED_MAX: &str = "VITRINE_SCRAMBLE_SPEED_MAX";
pub const ENV_SCRAMBLE_START_SPREAD: &str = "VITRINE_SCRAMBLE_START_SPREAD";
pub const ENV_SCRAMBLE_REROLL: &str = "VITRINE_SCRAMBLE_REROLL";
pub const ENV_SCRAMBLE_SEED: &str = "VITRINE_SCRAMBLE_SEED";

const DEFAULT_EXIT: Duration = Duration::from_millis(300);
const DEFAULT_ENTER: Duration = Duration::from_millis(300);
const DEFAULT_EASING: &str = "ease-out";

/// Timing, entrance, and scramble settings for a controller.
#[derive(Debug, Clone)]
pub struct SwitcherConfig {
    pub exit_duration: Duration,
    pub enter_duration: Duration,
    /// Seconds between the exit's end and the enter's start; negative
    /// values overlap.
    pub overlap_seconds: f64,
    pub enter_offset: i16,
    pub enter_stagger: Duration,
    pub stagger_mode: StaggerMode,
    /// Easing name (see [`NAMED_EASINGS`]).
    pub easing: String,
    pub scramble_on_enter: bool,
    pub scramble: ScrambleConfig,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            exit_duration: DEFAULT_EXIT,
            enter_duration: DEFAULT_ENTER,
            overlap_seconds: 0.0,
            enter_offset: 0,
            enter_stagger: Duration::ZERO,
            stagger_mode: StaggerMode::Linear,
            easing: DEFAULT_EASING.to_string(),
            scramble_on_enter: true,
            scramble: ScrambleConfig::default(),
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct SwitcherConfigParse {
    pub config: SwitcherConfig,
    pub errors: Vec<ConfigError>,
}

/// A rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl SwitcherConfig {
    /// Parse config from environment variables, dropping diagnostics.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> SwitcherConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Parse config from an arbitrary key lookup.
    #[must_use]
    pub fn from_env_with<F>(get: F) -> SwitcherConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        from_env_with(get)
    }

    #[must_use]
    pub fn exit_duration(mut self, duration: Duration) -> Self {
        self.exit_duration = duration;
        self
    }

    #[must_use]
    pub fn enter_duration(mut self, duration: Duration) -> Self {
        self.enter_duration = duration;
        self
    }

    #[must_use]
    pub fn overlap_seconds(mut self, seconds: f64) -> Self {
        self.overlap_seconds = seconds;
        self
    }

    #[must_use]
    pub fn enter_offset(mut self, offset: i16) -> Self {
        self.enter_offset = offset;
        self
    }

    #[must_use]
    pub fn enter_stagger(mut self, step: Duration) -> Self {
        self.enter_stagger = step;
        self
    }

    /// Spread of sub-region delays; `StaggerMode::Custom` takes any easing.
    #[must_use]
    pub fn stagger_mode(mut self, mode: StaggerMode) -> Self {
        self.stagger_mode = mode;
        self
    }

    #[must_use]
    pub fn easing(mut self, name: impl Into<String>) -> Self {
        self.easing = name.into();
        self
    }

    #[must_use]
    pub fn scramble_on_enter(mut self, enabled: bool) -> Self {
        self.scramble_on_enter = enabled;
        self
    }

    #[must_use]
    pub fn scramble(mut self, scramble: ScrambleConfig) -> Self {
        self.scramble = scramble;
        self
    }

    /// Resolved easing; unknown names fall back to ease-out.
    #[must_use]
    pub fn easing_fn(&self) -> EasingFn {
        easing_by_name(&self.easing).unwrap_or(ease_out)
    }

    /// Where the enter starts relative to the exits.
    #[must_use]
    pub fn enter_start(&self) -> StartOffset {
        StartOffset::relative(self.overlap_seconds)
    }

    /// Tween settings handed to each group's scheduler.
    #[must_use]
    pub fn timing(&self) -> TransitionTiming {
        TransitionTiming {
            exit: self.exit_duration,
            enter: self.enter_duration,
            easing: self.easing_fn(),
            enter_offset: self.enter_offset,
            stagger: self.enter_stagger,
            stagger_mode: self.stagger_mode,
        }
    }

    /// Scramble settings for the `index`th group.
    ///
    /// A fixed seed is mixed with the index so groups do not scramble in
    /// lockstep.
    #[must_use]
    pub fn scramble_for_group(&self, index: usize) -> ScrambleConfig {
        let mut scramble = self.scramble.clone();
        if let Some(seed) = scramble.seed {
            scramble.seed = Some(seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        }
        scramble
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if !self.overlap_seconds.is_finite() {
            errors.push(ConfigError::new(
                "overlap_seconds",
                self.overlap_seconds.to_string(),
                "expected finite seconds",
            ));
        }
        if easing_by_name(&self.easing).is_none() {
            errors.push(ConfigError::new(
                "easing",
                self.easing.clone(),
                easing_names_message(),
            ));
        }
        if self.scramble.glyphs.is_empty() {
            errors.push(ConfigError::new(
                "glyph_set",
                "",
                "expected at least one glyph",
            ));
        }
        let p = self.scramble.reroll_probability;
        if !(0.0..=1.0).contains(&p) {
            errors.push(ConfigError::new(
                "scramble_reroll",
                p.to_string(),
                "expected probability in [0, 1]",
            ));
        }
        if self.scramble.speed_min > self.scramble.speed_max {
            errors.push(ConfigError::new(
                "scramble_speed",
                format!("{}..{}", self.scramble.speed_min, self.scramble.speed_max),
                "speed_min must not exceed speed_max",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn easing_names_message() -> String {
    let names: Vec<&str> = NAMED_EASINGS.iter().map(|(n, _)| *n).collect();
    format!("expected {}", names.join("|"))
}

fn from_env_with<F>(mut get: F) -> SwitcherConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = SwitcherConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_EXIT_DURATION) {
        match parse_seconds(&value) {
            Some(parsed) => config.exit_duration = parsed,
            None => errors.push(ConfigError::new(
                "exit_duration",
                value,
                "expected non-negative seconds",
            )),
        }
    }

    if let Some(value) = get(ENV_ENTER_DURATION) {
        match parse_seconds(&value) {
            Some(parsed) => config.enter_duration = parsed,
            None => errors.push(ConfigError::new(
                "enter_duration",
                value,
                "expected non-negative seconds",
            )),
        }
    }

    if let Some(value) = get(ENV_OVERLAP) {
        match parse_f64(&value) {
            Some(parsed) => config.overlap_seconds = parsed,
            None => errors.push(ConfigError::new(
                "overlap_seconds",
                value,
                "expected finite seconds",
            )),
        }
    }

    if let Some(value) = get(ENV_ENTER_OFFSET) {
        match value.trim().parse::<i16>() {
            Ok(parsed) => config.enter_offset = parsed,
            Err(_) => errors.push(ConfigError::new(
                "enter_offset",
                value,
                "expected integer in i16 range",
            )),
        }
    }

    if let Some(value) = get(ENV_ENTER_STAGGER) {
        match parse_seconds(&value) {
            Some(parsed) => config.enter_stagger = parsed,
            None => errors.push(ConfigError::new(
                "enter_stagger",
                value,
                "expected non-negative seconds",
            )),
        }
    }

    if let Some(value) = get(ENV_ENTER_STAGGER_MODE) {
        match StaggerMode::by_name(&value) {
            Some(parsed) => config.stagger_mode = parsed,
            None => errors.push(ConfigError::new(
                "stagger_mode",
                value,
                "expected linear|ease-in|ease-out",
            )),
        }
    }

    if let Some(value) = get(ENV_EASING) {
        if easing_by_name(&value).is_some() {
            config.easing = value.trim().to_ascii_lowercase().replace('_', "-");
        } else {
            errors.push(ConfigError::new("easing", value, easing_names_message()));
        }
    }

    if let Some(value) = get(ENV_SCRAMBLE) {
        match parse_bool(&value) {
            Some(parsed) => config.scramble_on_enter = parsed,
            None => errors.push(ConfigError::new(
                "scramble",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    if let Some(value) = get(ENV_GLYPH_SET) {
        if value.is_empty() {
            errors.push(ConfigError::new(
                "glyph_set",
                value,
                "expected at least one glyph",
            ));
        } else {
            config.scramble.glyphs = value;
        }
    }

    if let Some(value) = get(ENV_SCRAMBLE_SPEED_MIN) {
        match parse_u32(&value) {
            Some(parsed) => config.scramble.speed_min = parsed,
            None => errors.push(ConfigError::new(
                "scramble_speed_min",
                value,
                "expected frame count",
            )),
        }
    }

    if let Some(value) = get(ENV_SCRAMBLE_SPEED_MAX) {
        match parse_u32(&value) {
            Some(parsed) => config.scramble.speed_max = parsed,
            None => errors.push(ConfigError::new(
                "scramble_speed_max",
                value,
                "expected frame count",
            )),
        }
    }

    if let Some(value) = get(ENV_SCRAMBLE_START_SPREAD) {
        match parse_u32(&value) {
            Some(parsed) => config.scramble.start_spread = parsed,
            None => errors.push(ConfigError::new(
                "scramble_start_spread",
                value,
                "expected frame count",
            )),
        }
    }

    if let Some(value) = get(ENV_SCRAMBLE_REROLL) {
        match parse_f64(&value).filter(|p| (0.0..=1.0).contains(p)) {
            Some(parsed) => config.scramble.reroll_probability = parsed,
            None => errors.push(ConfigError::new(
                "scramble_reroll",
                value,
                "expected probability in [0, 1]",
            )),
        }
    }

    if let Some(value) = get(ENV_SCRAMBLE_SEED) {
        match value.trim().parse::<u64>() {
            Ok(parsed) => config.scramble.seed = Some(parsed),
            Err(_) => errors.push(ConfigError::new(
                "scramble_seed",
                value,
                "expected unsigned integer",
            )),
        }
    }

    if let Err(mut validation) = config.validate() {
        // Cross-field violations survive per-field parsing; restore defaults.
        let defaults = ScrambleConfig::default();
        if validation.iter().any(|e| e.field == "scramble_speed") {
            config.scramble.speed_min = defaults.speed_min;
            config.scramble.speed_max = defaults.speed_max;
        }
        errors.append(&mut validation);
    }

    tracing::debug!(
        errors = errors.len(),
        overlap = config.overlap_seconds,
        scramble = config.scramble_on_enter,
        "switcher config parsed"
    );

    SwitcherConfigParse { config, errors }
}

#[inline]
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[inline]
fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

#[inline]
fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[inline]
fn parse_seconds(value: &str) -> Option<Duration> {
    parse_f64(value)
        .filter(|secs| *secs >= 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(pairs: &[(&'static str, &str)]) -> SwitcherConfigParse {
        let env: HashMap<&str, &str> = pairs.iter().copied().collect();
        SwitcherConfig::from_env_with(|key| env.get(key).map(|value| value.to_string()))
    }

    #[test]
    fn defaults_are_valid() {
        let parsed = parse(&[]);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let config = parsed.config;
        assert_eq!(config.exit_duration, DEFAULT_EXIT);
        assert_eq!(config.enter_duration, DEFAULT_ENTER);
        assert_eq!(config.overlap_seconds, 0.0);
        assert!(config.scramble_on_enter);
        assert_eq!(config.scramble.speed_max, 20);
        assert_eq!(config.scramble.seed, None);
    }

    #[test]
    fn env_overrides() {
        let parsed = parse(&[
            (ENV_EXIT_DURATION, "0.5"),
            (ENV_ENTER_DURATION, "0.25"),
            (ENV_OVERLAP, "-0.1"),
            (ENV_ENTER_OFFSET, "-12"),
            (ENV_ENTER_STAGGER, "0.04"),
            (ENV_ENTER_STAGGER_MODE, "ease-out"),
            (ENV_EASING, "EASE_IN_OUT"),
            (ENV_SCRAMBLE, "off"),
            (ENV_GLYPH_SET, "01"),
            (ENV_SCRAMBLE_SPEED_MIN, "4"),
            (ENV_SCRAMBLE_SPEED_MAX, "4"),
            (ENV_SCRAMBLE_START_SPREAD, "6"),
            (ENV_SCRAMBLE_REROLL, "0.5"),
            (ENV_SCRAMBLE_SEED, "99"),
        ]);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let config = parsed.config;
        assert_eq!(config.exit_duration, Duration::from_millis(500));
        assert_eq!(config.enter_duration, Duration::from_millis(250));
        assert_eq!(config.overlap_seconds, -0.1);
        assert_eq!(config.enter_offset, -12);
        assert_eq!(config.enter_stagger, Duration::from_millis(40));
        assert!(matches!(config.timing().stagger_mode, StaggerMode::EaseOut));
        assert_eq!(config.easing, "ease-in-out");
        assert!(!config.scramble_on_enter);
        assert_eq!(config.scramble.glyphs, "01");
        assert!(config.scramble.is_fixed_duration());
        assert_eq!(config.scramble.start_spread, 6);
        assert_eq!(config.scramble.reroll_probability, 0.5);
        assert_eq!(config.scramble.seed, Some(99));
    }

    #[test]
    fn invalid_values_reported_and_defaulted() {
        let parsed = parse(&[
            (ENV_EXIT_DURATION, "-1"),
            (ENV_OVERLAP, "NaN"),
            (ENV_EASING, "bouncy"),
            (ENV_SCRAMBLE, "maybe"),
            (ENV_GLYPH_SET, ""),
            (ENV_SCRAMBLE_REROLL, "1.5"),
            (ENV_ENTER_OFFSET, "40000"),
            (ENV_ENTER_STAGGER_MODE, "zigzag"),
        ]);
        for field in [
            "exit_duration",
            "overlap_seconds",
            "easing",
            "scramble",
            "glyph_set",
            "scramble_reroll",
            "enter_offset",
            "stagger_mode",
        ] {
            assert!(
                parsed.errors.iter().any(|e| e.field == field),
                "missing error for {field}: {:?}",
                parsed.errors
            );
        }
        let config = parsed.config;
        assert_eq!(config.exit_duration, DEFAULT_EXIT);
        assert_eq!(config.overlap_seconds, 0.0);
        assert_eq!(config.easing, DEFAULT_EASING);
        assert!(config.scramble_on_enter);
        assert!(!config.scramble.glyphs.is_empty());
        assert!(matches!(config.stagger_mode, StaggerMode::Linear));
    }

    #[test]
    fn inverted_speed_range_falls_back() {
        let parsed = parse(&[
            (ENV_SCRAMBLE_SPEED_MIN, "30"),
            (ENV_SCRAMBLE_SPEED_MAX, "10"),
        ]);
        assert!(parsed.errors.iter().any(|e| e.field == "scramble_speed"));
        assert_eq!(parsed.config.scramble.speed_min, 0);
        assert_eq!(parsed.config.scramble.speed_max, 20);
    }

    #[test]
    fn validate_collects_every_violation() {
        let mut config = SwitcherConfig::default().easing("nope");
        config.scramble.glyphs.clear();
        config.scramble.reroll_probability = 2.0;
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn group_seeds_differ() {
        let mut config = SwitcherConfig::default();
        config.scramble.seed = Some(7);
        let a = config.scramble_for_group(0).seed;
        let b = config.scramble_for_group(1).seed;
        assert_eq!(a, Some(7));
        assert_ne!(a, b);
        assert_eq!(SwitcherConfig::default().scramble_for_group(3).seed, None);
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::new("easing", "bouncy", "expected linear");
        assert_eq!(err.to_string(), "easing=bouncy (expected linear)");
    }
}
