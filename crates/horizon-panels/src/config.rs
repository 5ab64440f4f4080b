//! Toolkit configuration.
//!
//! All tunable constants of the gesture, layout and animation code live in
//! [`ToolkitConfig`]. A tree owns one config; hosts build it in code or load
//! it from TOML:
//!
//! ```
//! use horizon_panels::ToolkitConfig;
//!
//! let config = ToolkitConfig::from_toml_str(r#"
//! fade_duration_ms = 120
//! zoom_threshold = 200.0
//! "#).unwrap();
//!
//! assert_eq!(config.fade_duration_ms, 120);
//! assert_eq!(config.wheel_zoom_rate, 0.1);
//! ```
//!
//! Missing keys fall back to their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use horizon_panels_core::logging::targets;

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The text is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The config could not be written as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A value is out of its valid range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunable constants for gestures, layouts and fades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Length of fade-in and fade-out transitions, in milliseconds.
    pub fade_duration_ms: u64,
    /// Minimum initial distance between two touches for a gesture to become
    /// a pinch zoom.
    pub zoom_threshold: f32,
    /// Exponent rate applied to wheel deltas: `factor = 2^(delta * rate)`.
    pub wheel_zoom_rate: f32,
    /// Largest zoom factor applied by a single event (its inverse bounds
    /// zooming out).
    pub max_zoom_step: f32,
    /// Pointer travel, in pixels, tolerated before a press stops counting as
    /// an action.
    pub action_slop: f32,
    /// Pointer travel, in pixels, before a drag source lifts its ghost.
    pub drag_threshold: f32,
    /// Width of the split-view handle hit area, and of the band along the
    /// cross-axis edges that turns a handle drag into a pane insertion.
    pub split_handle_size: f32,
    /// Split panes released below this extent are merged into their
    /// neighbor.
    pub merge_size_threshold: f32,
    /// Thickness of scroll-view scrollbars.
    pub scrollbar_thickness: f32,
    /// Shortest length a scrollbar thumb is drawn with.
    pub min_scrollbar_length: f32,
    /// Lower bound of the pan/zoom scale.
    pub min_scale: f32,
    /// Upper bound of the pan/zoom scale.
    pub max_scale: f32,
    /// Whether marquee selection toggles matches instead of force-selecting
    /// them.
    pub marquee_toggles: bool,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            fade_duration_ms: 250,
            zoom_threshold: 300.0,
            wheel_zoom_rate: 0.1,
            max_zoom_step: 2.0,
            action_slop: 0.0,
            drag_threshold: 0.0,
            split_handle_size: 8.0,
            merge_size_threshold: 16.0,
            scrollbar_thickness: 6.0,
            min_scrollbar_length: 16.0,
            min_scale: 0.1,
            max_scale: 10.0,
            marquee_toggles: true,
        }
    }
}

impl ToolkitConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        let positive = [
            ("zoom_threshold", self.zoom_threshold),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("scrollbar_thickness", self.scrollbar_thickness),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("action_slop", self.action_slop),
            ("drag_threshold", self.drag_threshold),
            ("split_handle_size", self.split_handle_size),
            ("merge_size_threshold", self.merge_size_threshold),
            ("min_scrollbar_length", self.min_scrollbar_length),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if self.min_scale > self.max_scale {
            return Err(ConfigError::Invalid(format!(
                "min_scale {} exceeds max_scale {}",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.max_zoom_step >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "max_zoom_step must be at least 1, got {}",
                self.max_zoom_step
            )));
        }
        Ok(())
    }

    /// Fade duration as a [`Duration`].
    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ToolkitConfig::default();
        assert_eq!(config.fade_duration(), Duration::from_millis(250));
        assert_eq!(config.zoom_threshold, 300.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ToolkitConfig::from_toml_str("merge_size_threshold = 4.0").unwrap();
        assert_eq!(config.merge_size_threshold, 4.0);
        assert_eq!(config.split_handle_size, 8.0);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = ToolkitConfig::default();
        config.max_scale = 4.0;
        let text = config.to_toml_string().unwrap();
        assert_eq!(ToolkitConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ToolkitConfig::from_toml_str("min_scale = 5.0\nmax_scale = 2.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ToolkitConfig::from_toml_str("zoom_threshold = -1.0").unwrap_err();
        assert!(err.to_string().contains("zoom_threshold"));
    }

    #[test]
    fn test_parse_error() {
        let err = ToolkitConfig::from_toml_str("fade_duration_ms = \"slow\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ToolkitConfig::load("/nonexistent/horizon-panels.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
