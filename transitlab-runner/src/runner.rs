//! Search runner: wires detection, derivation, and layout together.
//!
//! `run_search()` takes a loaded light curve and an engine, runs the
//! detect-and-suppress loop, interprets every detection physically, and lays
//! out the schematic when anything was found.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use transitlab_core::{
    derive, detect, layout, DetectionProgress, PlanetCandidate, RawCandidate, SchematicPoint,
    SignalSearchEngine, StellarParameters, TransitError,
};

use crate::config::{ConfigError, SearchConfig};
use crate::data_loader::{DataSource, LoadError, LoadedSeries};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error(transparent)]
    Transit(#[from] TransitError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of one search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub engine: String,
    pub source: DataSource,
    pub dataset_hash: String,
    pub sample_count: usize,
    pub config: SearchConfig,
    pub stellar: StellarParameters,
    /// True when no stellar mass was configured and 1.0 was assumed.
    pub stellar_mass_assumed: bool,
    /// Raw detections in detection order.
    pub candidates: Vec<RawCandidate>,
    /// Physical interpretation, one per candidate, same order.
    pub planets: Vec<PlanetCandidate>,
    /// Schematic positions; `None` when nothing was detected.
    pub schematic: Option<Vec<SchematicPoint>>,
    /// Star position on the schematic axis (AU).
    pub star_au: f64,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl SearchResult {
    pub fn has_detections(&self) -> bool {
        !self.candidates.is_empty()
    }
}

/// Run the full pipeline over a loaded light curve without touching the filesystem.
pub fn run_search(
    config: &SearchConfig,
    loaded: &LoadedSeries,
    engine: &dyn SignalSearchEngine,
    progress: Option<&dyn DetectionProgress>,
) -> Result<SearchResult, RunError> {
    config.validate()?;

    let stellar_mass_assumed = config.star.mass.is_none();
    let stellar = match config.star.mass {
        Some(mass) => StellarParameters { mass },
        None => {
            warn!("no stellar mass configured; assuming 1.0 solar mass");
            StellarParameters::default()
        }
    };

    info!(
        engine = engine.name(),
        samples = loaded.series.len(),
        baseline_days = loaded.series.baseline_days(),
        "starting transit search"
    );

    let params = config.detection_params();
    let candidates = detect(&loaded.series, &params, engine, progress)?;
    let planets = derive(&candidates, stellar.mass)?;
    let schematic = if planets.is_empty() {
        None
    } else {
        Some(layout(&candidates, stellar.mass)?)
    };

    if planets.is_empty() {
        info!("no significant transit signals found");
    } else {
        info!(detected = planets.len(), "transit search finished");
    }

    Ok(SearchResult {
        schema_version: SCHEMA_VERSION,
        engine: engine.name().to_string(),
        source: loaded.source.clone(),
        dataset_hash: loaded.dataset_hash.clone(),
        sample_count: loaded.series.len(),
        config: config.clone(),
        stellar,
        stellar_mass_assumed,
        candidates,
        planets,
        schematic,
        star_au: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use transitlab_core::{SearchError, TimeSeries};

    struct Fixed(Vec<f64>, std::cell::Cell<usize>);

    impl SignalSearchEngine for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn search(
            &self,
            _time: &[f64],
            _flux: &[f64],
            _period_min: f64,
            _period_max: f64,
        ) -> Result<RawCandidate, SearchError> {
            let i = self.1.get();
            self.1.set(i + 1);
            Ok(RawCandidate {
                period: 4.0 * (i + 1) as f64,
                duration: 2.0,
                epoch: 0.5,
                depth: 0.001,
                significance: self.0.get(i).copied().unwrap_or(0.0),
                radius_ratio: 0.0316,
                scaled_semi_major_axis: None,
            })
        }
    }

    fn loaded() -> LoadedSeries {
        let time: Vec<f64> = (0..100).map(|i| i as f64 * 0.2).collect();
        LoadedSeries::from_series(
            TimeSeries::new(time, vec![1.0; 100]).unwrap(),
            DataSource::Synthetic {
                name: "unit".into(),
            },
        )
    }

    #[test]
    fn missing_mass_is_assumed_solar() {
        let engine = Fixed(vec![9.0], Default::default());
        let result = run_search(&SearchConfig::default(), &loaded(), &engine, None).unwrap();
        assert!(result.stellar_mass_assumed);
        assert_eq!(result.stellar.mass, 1.0);
        assert_eq!(result.planets.len(), 1);
        assert_eq!(result.schematic.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn no_detections_has_no_schematic() {
        let engine = Fixed(vec![1.0], Default::default());
        let result = run_search(&SearchConfig::default(), &loaded(), &engine, None).unwrap();
        assert!(!result.has_detections());
        assert!(result.planets.is_empty());
        assert!(result.schematic.is_none());
    }

    #[test]
    fn invalid_config_fails_before_search() {
        let engine = Fixed(vec![9.0], Default::default());
        let mut config = SearchConfig::default();
        config.search.period_min = 10.0;
        config.search.period_max = 5.0;
        let err = run_search(&config, &loaded(), &engine, None).unwrap_err();
        assert!(matches!(err, RunError::Config(_)));
        assert_eq!(engine.1.get(), 0);
    }
}
