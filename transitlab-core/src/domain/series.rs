//! TimeSeries: a normalized stellar light curve.

use serde::{Deserialize, Serialize};

use crate::error::TransitError;

/// Ordered (time, flux) samples with flux normalized around 1.0.
///
/// Time is in days and never decreases. Every sample is finite. Construction
/// through [`TimeSeries::new`] is the only way to obtain one, so downstream code
/// can rely on these invariants without re-checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct TimeSeries {
    time: Vec<f64>,
    flux: Vec<f64>,
}

#[derive(Deserialize)]
struct RawSeries {
    time: Vec<f64>,
    flux: Vec<f64>,
}

impl TryFrom<RawSeries> for TimeSeries {
    type Error = TransitError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        Self::new(raw.time, raw.flux)
    }
}

impl TimeSeries {
    /// Build a series, rejecting malformed input with `TransitError::Ingestion`.
    pub fn new(time: Vec<f64>, flux: Vec<f64>) -> Result<Self, TransitError> {
        if time.len() != flux.len() {
            return Err(TransitError::Ingestion(format!(
                "time has {} samples but flux has {}",
                time.len(),
                flux.len()
            )));
        }
        if time.is_empty() {
            return Err(TransitError::Ingestion("series has no samples".into()));
        }
        if let Some(i) = time.iter().position(|t| !t.is_finite()) {
            return Err(TransitError::Ingestion(format!(
                "non-finite time at sample {i}"
            )));
        }
        if let Some(i) = flux.iter().position(|f| !f.is_finite()) {
            return Err(TransitError::Ingestion(format!(
                "non-finite flux at sample {i}"
            )));
        }
        if let Some(i) = time.windows(2).position(|w| w[1] < w[0]) {
            return Err(TransitError::Ingestion(format!(
                "time decreases between samples {i} and {}",
                i + 1
            )));
        }
        Ok(Self { time, flux })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false for a constructed series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Observed time span in days.
    pub fn baseline_days(&self) -> f64 {
        match (self.time.first(), self.time.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}
