//! Iterative detect-and-suppress loop.
//!
//! Each iteration asks the engine for the strongest remaining signal. A signal
//! at or above the significance threshold is recorded and its in-transit
//! samples are reset to the 1.0 baseline in a private working copy of the flux,
//! so the next search cannot find the same period again. The first
//! sub-threshold result ends the run and is not recorded.

pub mod mask;

use tracing::{debug, info};

use crate::domain::{RawCandidate, TimeSeries};
use crate::error::{ProgressError, TransitError};
use crate::search::{SearchError, SignalSearchEngine};

pub use mask::{in_transit, transit_mask};

/// Flux value written over suppressed in-transit samples.
pub const BASELINE_FLUX: f64 = 1.0;

/// Bounds and stopping rule for one detection run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// Upper bound on engine calls (and therefore on candidates).
    pub max_iterations: usize,
    /// Minimum significance for a candidate to be kept.
    pub significance_threshold: f64,
    /// Shortest trial period in days.
    pub period_min: f64,
    /// Longest trial period in days.
    pub period_max: f64,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            significance_threshold: 5.0,
            period_min: 1.0,
            period_max: 150.0,
        }
    }
}

impl DetectionParams {
    /// Reject bounds the loop cannot honour.
    pub fn validate(&self) -> Result<(), TransitError> {
        if !self.significance_threshold.is_finite() {
            return Err(TransitError::InvalidParameter(format!(
                "significance_threshold must be finite, got {}",
                self.significance_threshold
            )));
        }
        if !(self.period_min.is_finite() && self.period_min > 0.0) {
            return Err(TransitError::InvalidParameter(format!(
                "period_min must be positive, got {}",
                self.period_min
            )));
        }
        if !(self.period_max.is_finite() && self.period_max > 0.0) {
            return Err(TransitError::InvalidParameter(format!(
                "period_max must be positive, got {}",
                self.period_max
            )));
        }
        if self.period_min >= self.period_max {
            return Err(TransitError::InvalidParameter(format!(
                "period_min ({}) must be below period_max ({})",
                self.period_min, self.period_max
            )));
        }
        Ok(())
    }
}

/// Observer notified at the start of every iteration.
///
/// Purely observational: it cannot steer the loop. An `Err` aborts the run,
/// the same as an engine failure.
pub trait DetectionProgress {
    fn on_iteration(&self, iteration: usize, total: usize) -> Result<(), ProgressError>;
}

/// Progress sink that emits a `tracing` event per iteration.
pub struct LogProgress;

impl DetectionProgress for LogProgress {
    fn on_iteration(&self, iteration: usize, total: usize) -> Result<(), ProgressError> {
        info!("transit search iteration {}/{}", iteration + 1, total);
        Ok(())
    }
}

/// Run the detect-and-suppress loop over `series`.
///
/// The series itself is never modified. Returns candidates in detection
/// order; all of them meet `params.significance_threshold`. Any engine or
/// progress failure aborts the whole call.
pub fn detect(
    series: &TimeSeries,
    params: &DetectionParams,
    engine: &dyn SignalSearchEngine,
    progress: Option<&dyn DetectionProgress>,
) -> Result<Vec<RawCandidate>, TransitError> {
    params.validate()?;

    let time = series.time();
    let mut working_flux = series.flux().to_vec();
    let mut found: Vec<RawCandidate> = Vec::new();

    for i in 0..params.max_iterations {
        if let Some(p) = progress {
            p.on_iteration(i, params.max_iterations)
                .map_err(|source| TransitError::ProgressSinkFailure {
                    found: found.len(),
                    source,
                })?;
        }

        let candidate = engine
            .search(time, &working_flux, params.period_min, params.period_max)
            .map_err(|source| TransitError::SearchEngineFailure {
                found: found.len(),
                source,
            })?;

        // A sub-threshold result is discarded whole, geometry included.
        if candidate.significance < params.significance_threshold {
            debug!(
                iteration = i,
                significance = candidate.significance,
                threshold = params.significance_threshold,
                "signal below threshold, stopping"
            );
            break;
        }

        // NaN significance falls through to here and is rejected.
        candidate
            .check_usable()
            .map_err(|msg| TransitError::SearchEngineFailure {
                found: found.len(),
                source: SearchError::UnusableCandidate(msg),
            })?;

        let masked = suppress(time, &mut working_flux, &candidate);
        debug!(
            iteration = i,
            period = candidate.period,
            significance = candidate.significance,
            masked,
            "accepted candidate"
        );
        found.push(candidate);
    }

    info!(
        engine = engine.name(),
        candidates = found.len(),
        "transit search complete"
    );
    Ok(found)
}

/// Reset in-transit samples of `flux` to the baseline. Returns how many were reset.
fn suppress(time: &[f64], flux: &mut [f64], candidate: &RawCandidate) -> usize {
    let mut masked = 0;
    for (t, f) in time.iter().zip(flux.iter_mut()) {
        if in_transit(*t, candidate.period, candidate.duration, candidate.epoch) {
            *f = BASELINE_FLUX;
            masked += 1;
        }
    }
    masked
}
