//! Light-curve loading for the runner.
//!
//! Reads a CSV with `time` and `flux` columns and applies the cleaning steps
//! configured in `[ingest]`:
//! 1. Drop rows whose time or flux is missing or non-finite
//! 2. Sort by time
//! 3. Drop flux outliers beyond `sigma_clip` standard deviations of the median,
//!    repeating until a pass removes nothing (at most five passes)
//! 4. Divide by the median flux so the baseline sits at 1.0
//! 5. Divide by a running median `detrend_window_days` wide, removing slow
//!    stellar variability while keeping transits much shorter than the window
//!
//! The result is a validated `TimeSeries` plus provenance for the run record.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use transitlab_core::{TimeSeries, TransitError};

use crate::config::IngestConfig;

/// Column names accepted for the time axis, in priority order.
const TIME_COLUMNS: &[&str] = &["time", "bjd", "btjd"];
/// Column names accepted for flux, in priority order.
const FLUX_COLUMNS: &[&str] = &["flux", "pdcsap_flux", "sap_flux"];
/// Upper bound on sigma-clipping passes.
const MAX_CLIP_PASSES: usize = 5;

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open light curve '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column: expected one of {expected:?}")]
    MissingColumn { expected: &'static [&'static str] },

    #[error("row {row}: cannot parse '{value}' as a number")]
    BadNumber { row: usize, value: String },

    #[error("no usable samples after cleaning ({dropped} dropped)")]
    Empty { dropped: usize },

    #[error("median flux is {0}; cannot normalize")]
    BadMedian(f64),

    #[error("running median is {value} at t = {time}; cannot detrend")]
    BadTrend { time: f64, value: f64 },

    #[error(transparent)]
    Series(#[from] TransitError),
}

/// Where a light curve came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Csv { path: String },
    Synthetic { name: String },
}

/// A cleaned light curve with provenance.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: TimeSeries,
    pub source: DataSource,
    /// BLAKE3 over all time/flux values, for run fingerprints.
    pub dataset_hash: String,
    pub dropped_nonfinite: usize,
    pub dropped_outliers: usize,
}

impl LoadedSeries {
    /// Wrap an already-clean series (e.g. synthetic data).
    pub fn from_series(series: TimeSeries, source: DataSource) -> Self {
        let dataset_hash = compute_dataset_hash(&series);
        Self {
            series,
            source,
            dataset_hash,
            dropped_nonfinite: 0,
            dropped_outliers: 0,
        }
    }
}

/// Load and clean a light curve from a CSV file.
pub fn load_csv(path: &Path, opts: &IngestConfig) -> Result<LoadedSeries, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut loaded = parse_csv(file, opts)?;
    loaded.source = DataSource::Csv {
        path: path.display().to_string(),
    };
    Ok(loaded)
}

/// Parse and clean a light curve from any CSV reader.
pub fn parse_csv<R: Read>(reader: R, opts: &IngestConfig) -> Result<LoadedSeries, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let time_idx = find_column(&headers, TIME_COLUMNS)?;
    let flux_idx = find_column(&headers, FLUX_COLUMNS)?;

    let mut samples: Vec<(f64, f64)> = Vec::new();
    let mut dropped_nonfinite = 0;

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // +2: one for the header, one for 1-based rows
        let row = i + 2;
        let t = parse_field(record.get(time_idx), row)?;
        let f = parse_field(record.get(flux_idx), row)?;
        match (t, f) {
            (Some(t), Some(f)) if t.is_finite() && f.is_finite() => samples.push((t, f)),
            _ => dropped_nonfinite += 1,
        }
    }

    if samples.is_empty() {
        return Err(LoadError::Empty {
            dropped: dropped_nonfinite,
        });
    }

    samples.sort_by(|a, b| a.0.total_cmp(&b.0));

    let before_clip = samples.len();
    if opts.sigma_clip > 0.0 {
        samples = sigma_clip(samples, opts.sigma_clip);
    }
    let dropped_outliers = before_clip - samples.len();
    if dropped_outliers > 0 {
        debug!(dropped_outliers, sigma = opts.sigma_clip, "clipped flux outliers");
    }
    if dropped_nonfinite > 0 {
        warn!(dropped_nonfinite, "dropped rows with missing or non-finite values");
    }

    let (time, mut flux): (Vec<f64>, Vec<f64>) = samples.into_iter().unzip();

    if opts.normalize {
        let m = median(&flux);
        if !(m.is_finite() && m != 0.0) {
            return Err(LoadError::BadMedian(m));
        }
        for f in &mut flux {
            *f /= m;
        }
    }

    if opts.detrend_window_days > 0.0 {
        detrend(&time, &mut flux, opts.detrend_window_days)?;
        debug!(window_days = opts.detrend_window_days, "detrended flux");
    }

    let series = TimeSeries::new(time, flux)?;
    let dataset_hash = compute_dataset_hash(&series);

    Ok(LoadedSeries {
        series,
        source: DataSource::Csv {
            path: String::new(),
        },
        dataset_hash,
        dropped_nonfinite,
        dropped_outliers,
    })
}

fn find_column(
    headers: &csv::StringRecord,
    names: &'static [&'static str],
) -> Result<usize, LoadError> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h.eq_ignore_ascii_case(name)))
        .ok_or(LoadError::MissingColumn { expected: names })
}

/// Empty fields are missing values; anything else must parse (`nan` included).
fn parse_field(field: Option<&str>, row: usize) -> Result<Option<f64>, LoadError> {
    match field {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<f64>().map(Some).map_err(|_| LoadError::BadNumber {
            row,
            value: s.to_string(),
        }),
    }
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Divide `flux` by its running median over a window of `window_days`
/// centred on each sample. `time` must be sorted.
///
/// Variability slower than the window is flattened to 1.0; dips covering well
/// under half the window survive with their depth intact.
pub fn detrend(time: &[f64], flux: &mut [f64], window_days: f64) -> Result<(), LoadError> {
    let trend = running_median(time, flux, window_days / 2.0);
    for ((f, m), t) in flux.iter_mut().zip(&trend).zip(time) {
        if !(m.is_finite() && *m > 0.0) {
            return Err(LoadError::BadTrend {
                time: *t,
                value: *m,
            });
        }
        *f /= m;
    }
    Ok(())
}

/// Median of `values[j]` over every `j` with `|time[j] - time[i]| <= half_width`.
fn running_median(time: &[f64], values: &[f64], half_width: f64) -> Vec<f64> {
    let n = time.len();
    // Sorted copy of values[lo..hi].
    let mut window: Vec<f64> = Vec::new();
    let (mut lo, mut hi) = (0, 0);
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        while hi < n && time[hi] - time[i] <= half_width {
            let v = values[hi];
            let pos = window.partition_point(|x| x.total_cmp(&v).is_lt());
            window.insert(pos, v);
            hi += 1;
        }
        while time[i] - time[lo] > half_width {
            let v = values[lo];
            let pos = window.partition_point(|x| x.total_cmp(&v).is_lt());
            window.remove(pos);
            lo += 1;
        }
        let mid = window.len() / 2;
        out.push(if window.len() % 2 == 0 {
            (window[mid - 1] + window[mid]) / 2.0
        } else {
            window[mid]
        });
    }
    out
}

/// Iterated clip: each pass recomputes median and spread from the survivors.
fn sigma_clip(mut samples: Vec<(f64, f64)>, sigma: f64) -> Vec<(f64, f64)> {
    for _ in 0..MAX_CLIP_PASSES {
        let before = samples.len();
        samples = sigma_clip_once(samples, sigma);
        if samples.len() == before {
            break;
        }
    }
    samples
}

fn sigma_clip_once(samples: Vec<(f64, f64)>, sigma: f64) -> Vec<(f64, f64)> {
    let flux: Vec<f64> = samples.iter().map(|s| s.1).collect();
    let n = flux.len() as f64;
    let mean = flux.iter().sum::<f64>() / n;
    let std = (flux.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / n).sqrt();
    if std == 0.0 {
        return samples;
    }
    let center = median(&flux);
    samples
        .into_iter()
        .filter(|(_, f)| (f - center).abs() <= sigma * std)
        .collect()
}

/// Deterministic BLAKE3 hash over every time and flux value.
pub fn compute_dataset_hash(series: &TimeSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    for (t, f) in series.time().iter().zip(series.flux()) {
        hasher.update(&t.to_le_bytes());
        hasher.update(&f.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
