//! Session configuration.
//!
//! [`VisualizerConfig`] collects everything a
//! [`Visualizer`](crate::session::Visualizer) needs at construction time. It
//! can be built programmatically with the `with_*` methods or loaded from
//! environment variables with [`VisualizerConfig::from_env`].
//!
//! # Environment Variables
//!
//! | Variable                | Meaning                         | Default |
//! |-------------------------|---------------------------------|---------|
//! | `TREEVIZ_KIND`          | initial structure kind          | `BST`   |
//! | `TREEVIZ_STEP_MODE`     | `timed` or `manual`             | `timed` |
//! | `TREEVIZ_SPEED`         | playback speed factor, `> 0`    | `1.0`   |
//! | `TREEVIZ_SEED`          | RNG seed                        | random  |
//! | `TREEVIZ_CANVAS_WIDTH`  | canvas width, `> 0`             | `800`   |
//! | `TREEVIZ_CANVAS_HEIGHT` | canvas height, `> 0`            | `600`   |
//!
//! # Example
//!
//! ```rust
//! use treeviz::config::VisualizerConfig;
//! use treeviz::kind::StructureKind;
//! use treeviz::step::StepMode;
//!
//! let config = VisualizerConfig::default()
//!     .with_kind(StructureKind::Avl)
//!     .with_step_mode(StepMode::Manual)
//!     .with_seed(7);
//! assert_eq!(config.seed, Some(7));
//! ```

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use kurbo::Size;

use crate::Key;
use crate::error::ConfigError;
use crate::graph::{GraphConfig, LayoutConfig};
use crate::kind::StructureKind;
use crate::step::{StepDelays, StepMode};

/// Configuration of a visualizer session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualizerConfig {
    /// The structure kind selected at start.
    pub kind: StructureKind,
    /// Initial step mode.
    pub step_mode: StepMode,
    /// Timed-mode delays, including the speed factor.
    pub delays: StepDelays,
    /// Seed for random fills and graph generation; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Random graph parameters.
    pub graph: GraphConfig,
    /// Force layout parameters.
    pub layout: LayoutConfig,
    /// Number of keys produced by random fills and random heaps.
    pub random_count: usize,
    /// Largest random key; random keys are drawn from `1..=random_max`.
    pub random_max: Key,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            kind: StructureKind::default(),
            step_mode: StepMode::default(),
            delays: StepDelays::default(),
            seed: None,
            graph: GraphConfig::default(),
            layout: LayoutConfig::default(),
            random_count: 15,
            random_max: 100,
        }
    }
}

impl VisualizerConfig {
    /// Loads configuration from `TREEVIZ_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set but cannot
    /// be parsed or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let kind = get_optional_parsed(&lookup, "TREEVIZ_KIND", defaults.kind)?;
        let step_mode = match lookup("TREEVIZ_STEP_MODE") {
            None => defaults.step_mode,
            Some(value) => parse_step_mode(&value)?,
        };
        let speed = get_optional_parsed(&lookup, "TREEVIZ_SPEED", defaults.delays.speed)?;
        require_positive("TREEVIZ_SPEED", speed)?;
        let seed = lookup("TREEVIZ_SEED")
            .map(|value| parse_value("TREEVIZ_SEED", &value))
            .transpose()?;
        let width = get_optional_parsed(
            &lookup,
            "TREEVIZ_CANVAS_WIDTH",
            defaults.layout.canvas.width,
        )?;
        require_positive("TREEVIZ_CANVAS_WIDTH", width)?;
        let height = get_optional_parsed(
            &lookup,
            "TREEVIZ_CANVAS_HEIGHT",
            defaults.layout.canvas.height,
        )?;
        require_positive("TREEVIZ_CANVAS_HEIGHT", height)?;

        let config = Self {
            kind,
            step_mode,
            seed,
            ..defaults
        }
        .with_speed(speed)
        .with_canvas(Size::new(width, height));

        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// Sets the initial structure kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: StructureKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the initial step mode.
    #[must_use]
    pub const fn with_step_mode(mut self, step_mode: StepMode) -> Self {
        self.step_mode = step_mode;
        self
    }

    /// Replaces the timed-mode delays.
    #[must_use]
    pub const fn with_delays(mut self, delays: StepDelays) -> Self {
        self.delays = delays;
        self
    }

    /// Sets the playback speed factor. Non-positive values are ignored.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.delays = self.delays.with_speed(speed);
        self
    }

    /// Fixes the RNG seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the canvas used by graph generation and layout.
    #[must_use]
    pub const fn with_canvas(mut self, canvas: Size) -> Self {
        self.graph = self.graph.with_canvas(canvas);
        self.layout = self.layout.with_canvas(canvas);
        self
    }
}

/// Gets an optional variable and parses it, with a default value.
fn get_optional_parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key).map_or(Ok(default), |value| parse_value(key, &value))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|error: T::Err| ConfigError::invalid_value(key, error.to_string()))
}

fn parse_step_mode(value: &str) -> Result<StepMode, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "timed" | "auto" => Ok(StepMode::Timed),
        "manual" | "step" => Ok(StepMode::Manual),
        _ => Err(ConfigError::invalid_value(
            "TREEVIZ_STEP_MODE",
            format!("expected `timed` or `manual`, got `{value}`"),
        )),
    }
}

fn require_positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid_value(key, "must be a positive number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let variables: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| variables.get(key).cloned()
    }

    #[rstest]
    fn test_empty_environment_gives_defaults() {
        let config = VisualizerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, VisualizerConfig::default());
    }

    #[rstest]
    fn test_all_variables_are_read() {
        let config = VisualizerConfig::from_lookup(lookup_from(&[
            ("TREEVIZ_KIND", "maxheap"),
            ("TREEVIZ_STEP_MODE", "Manual"),
            ("TREEVIZ_SPEED", "2.5"),
            ("TREEVIZ_SEED", "99"),
            ("TREEVIZ_CANVAS_WIDTH", "1024"),
            ("TREEVIZ_CANVAS_HEIGHT", "768"),
        ]))
        .unwrap();

        assert_eq!(config.kind, StructureKind::MaxHeap);
        assert_eq!(config.step_mode, StepMode::Manual);
        assert!((config.delays.speed - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.layout.canvas, Size::new(1024.0, 768.0));
        assert_eq!(config.graph.canvas, Size::new(1024.0, 768.0));
    }

    #[rstest]
    #[case("TREEVIZ_STEP_MODE", "sometimes")]
    #[case("TREEVIZ_SPEED", "fast")]
    #[case("TREEVIZ_SPEED", "0")]
    #[case("TREEVIZ_SEED", "-1")]
    #[case("TREEVIZ_CANVAS_WIDTH", "-5")]
    #[case("TREEVIZ_KIND", "splay")]
    fn test_invalid_values_are_rejected(#[case] key: &str, #[case] value: &str) {
        let result = VisualizerConfig::from_lookup(lookup_from(&[(key, value)]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: reported, .. }) if reported == key
        ));
    }

    #[rstest]
    fn test_builders_compose() {
        let config = VisualizerConfig::default()
            .with_speed(4.0)
            .with_canvas(Size::new(300.0, 200.0))
            .with_delays(StepDelays::instant());
        assert!((config.delays.speed - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.graph.canvas, Size::new(300.0, 200.0));
    }
}
