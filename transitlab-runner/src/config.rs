//! Serializable search configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! [search]
//! max_planets = 5
//! min_sde = 5.0
//! period_min = 1.0
//! period_max = 150.0
//!
//! [star]
//! mass = 0.92          # solar masses; omit to assume 1.0
//!
//! [engine]
//! period_samples = 3000
//! durations_hours = [1.0, 2.0, 3.0, 4.5, 6.0, 9.0]
//! phase_bins = 300
//!
//! [ingest]
//! sigma_clip = 5.0
//! normalize = true
//! detrend_window_days = 1.0   # 0 disables detrending
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use transitlab_core::DetectionParams;

/// Errors from reading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration for one search run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub search: SearchSection,
    pub star: StarConfig,
    pub engine: EngineConfig,
    pub ingest: IngestConfig,
}

/// Detection loop bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Maximum number of detect-and-suppress iterations.
    pub max_planets: usize,
    /// Minimum SDE for a detection to be kept.
    pub min_sde: f64,
    /// Shortest trial period (days).
    pub period_min: f64,
    /// Longest trial period (days).
    pub period_max: f64,
}

impl Default for SearchSection {
    fn default() -> Self {
        let p = DetectionParams::default();
        Self {
            max_planets: p.max_iterations,
            min_sde: p.significance_threshold,
            period_min: p.period_min,
            period_max: p.period_max,
        }
    }
}

/// Host star. `mass` is optional; the runner assumes 1.0 when it is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub mass: Option<f64>,
}

/// Grid settings for the reference box-search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Trial periods, spaced uniformly in frequency.
    pub period_samples: usize,
    /// Trial transit durations in hours.
    pub durations_hours: Vec<f64>,
    /// Phase bins used when folding.
    pub phase_bins: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            period_samples: 3000,
            durations_hours: vec![1.0, 2.0, 3.0, 4.5, 6.0, 9.0],
            phase_bins: 300,
        }
    }
}

/// Light-curve cleaning applied on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Drop samples further than this many standard deviations from the median.
    /// Zero or negative disables clipping.
    pub sigma_clip: f64,
    /// Divide flux by its median so the baseline sits at 1.0.
    pub normalize: bool,
    /// Width of the running-median detrending window in days.
    /// Should be several times the longest transit sought; zero disables.
    pub detrend_window_days: f64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            sigma_clip: 5.0,
            normalize: true,
            detrend_window_days: 1.0,
        }
    }
}

impl SearchConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Detection bounds for the core loop.
    pub fn detection_params(&self) -> DetectionParams {
        DetectionParams {
            max_iterations: self.search.max_planets,
            significance_threshold: self.search.min_sde,
            period_min: self.search.period_min,
            period_max: self.search.period_max,
        }
    }

    /// Check every section; called by the loaders and again after CLI overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detection_params()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if let Some(mass) = self.star.mass {
            if !(mass.is_finite() && mass > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "star.mass must be positive, got {mass}"
                )));
            }
        }
        if self.engine.period_samples < 2 {
            return Err(ConfigError::Invalid(
                "engine.period_samples must be at least 2".into(),
            ));
        }
        if self.engine.phase_bins < 4 {
            return Err(ConfigError::Invalid(
                "engine.phase_bins must be at least 4".into(),
            ));
        }
        if self.engine.durations_hours.is_empty() {
            return Err(ConfigError::Invalid(
                "engine.durations_hours must not be empty".into(),
            ));
        }
        if let Some(d) = self
            .engine
            .durations_hours
            .iter()
            .find(|d| !(d.is_finite() && **d > 0.0))
        {
            return Err(ConfigError::Invalid(format!(
                "engine.durations_hours entries must be positive, got {d}"
            )));
        }
        if self.ingest.sigma_clip.is_nan() {
            return Err(ConfigError::Invalid("ingest.sigma_clip is NaN".into()));
        }
        let window = self.ingest.detrend_window_days;
        if !(window.is_finite() && window >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "ingest.detrend_window_days must be zero or positive, got {window}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = SearchConfig::from_toml("").unwrap();
        assert_eq!(config, SearchConfig::default());
        assert_eq!(config.search.max_planets, 5);
        assert_eq!(config.search.min_sde, 5.0);
        assert_eq!(config.search.period_min, 1.0);
        assert_eq!(config.search.period_max, 150.0);
        assert_eq!(config.star.mass, None);
        assert_eq!(config.ingest.sigma_clip, 5.0);
        assert_eq!(config.ingest.detrend_window_days, 1.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = SearchConfig::from_toml(
            r#"
[search]
period_max = 40.0

[star]
mass = 0.8
"#,
        )
        .unwrap();
        assert_eq!(config.search.period_max, 40.0);
        assert_eq!(config.search.period_min, 1.0);
        assert_eq!(config.star.mass, Some(0.8));
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn inverted_period_range_is_invalid() {
        let err = SearchConfig::from_toml("[search]\nperiod_min = 10.0\nperiod_max = 5.0\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn negative_mass_is_invalid() {
        let err = SearchConfig::from_toml("[star]\nmass = -1.0\n").unwrap_err();
        assert!(err.to_string().contains("star.mass"));
    }

    #[test]
    fn negative_detrend_window_is_invalid() {
        let err = SearchConfig::from_toml("[ingest]\ndetrend_window_days = -0.5\n").unwrap_err();
        assert!(err.to_string().contains("detrend_window_days"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SearchConfig::from_toml("[search\nmax_planets = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = SearchConfig::from_file(Path::new("/nonexistent/transitlab.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn detection_params_mirror_search_section() {
        let mut config = SearchConfig::default();
        config.search.max_planets = 2;
        config.search.min_sde = 7.5;
        let p = config.detection_params();
        assert_eq!(p.max_iterations, 2);
        assert_eq!(p.significance_threshold, 7.5);
    }

    #[test]
    fn config_serialization_roundtrip() {
        let mut config = SearchConfig::default();
        config.star.mass = Some(1.2);
        let text = toml::to_string(&config).unwrap();
        assert_eq!(SearchConfig::from_toml(&text).unwrap(), config);
    }
}
