//! Thresholds used by the checks, loadable from YAML.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Named thresholds for every check.
///
/// Keys are camelCase in YAML and every key is optional; missing keys keep
/// their defaults and unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckerConfig {
    /// Minimum contrast between a solid shape fill and the slide background.
    pub shape_min_contrast_ratio: f64,

    /// Minimum contrast between a run's font color and what it sits on.
    pub font_min_contrast_ratio: f64,

    /// Minimum font size in points for runs of more than two words.
    pub min_font_size_pt: f64,

    /// Minimum width of a line shape in points.
    pub min_line_width_pt: f64,

    /// Maximum number of words on a slide.
    pub max_words_per_slide: usize,

    pub seconds_per_word: f64,
    pub seconds_per_pause: f64,
    pub seconds_per_break: f64,
    pub seconds_between_slides: f64,

    /// Fraction of the slide size a shape may move between slides before
    /// the move counts as deliberate.
    pub position_shift_tolerance: f64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            shape_min_contrast_ratio: 1.5,
            font_min_contrast_ratio: 3.0,
            min_font_size_pt: 18.0,
            min_line_width_pt: 2.0,
            max_words_per_slide: 30,
            seconds_per_word: 0.42,
            seconds_per_pause: 1.5,
            seconds_per_break: 3.0,
            seconds_between_slides: 2.0,
            position_shift_tolerance: 0.1,
        }
    }
}

impl CheckerConfig {
    /// Parse a YAML document. An empty document yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Load the configuration at `path`, falling back to the defaults when
    /// the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!(
                "No configuration at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))
    }
}
