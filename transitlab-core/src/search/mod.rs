//! The periodic-signal search seam.
//!
//! The detection statistic itself (BLS, TLS, or anything else) lives behind
//! `SignalSearchEngine`, so the detection loop can be driven by a real
//! periodogram or by a deterministic stub in tests.

use thiserror::Error;

use crate::domain::RawCandidate;

/// Errors raised by a search engine.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("series too short for search: {0}")]
    InsufficientData(String),

    #[error("invalid period range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    #[error("engine returned an unusable candidate: {0}")]
    UnusableCandidate(String),

    #[error("search failed: {0}")]
    Failed(String),
}

/// Finds the single best periodic transit signal in a light curve.
///
/// Implementations should be deterministic in their inputs; the detector's
/// reproducibility guarantees rest on it.
pub trait SignalSearchEngine {
    /// Human-readable name of this engine.
    fn name(&self) -> &str;

    /// Return the strongest candidate with period in `[period_min, period_max]` days.
    fn search(
        &self,
        time: &[f64],
        flux: &[f64],
        period_min: f64,
        period_max: f64,
    ) -> Result<RawCandidate, SearchError>;
}
