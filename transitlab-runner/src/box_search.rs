//! Reference box-least-squares search engine.
//!
//! For each trial period the light curve is folded into phase bins; a box of
//! each trial duration is slid around the fold and scored with the BLS signal
//! residue `SR = s² / (r (1 − r))`, where `s` is the summed dip below the mean
//! (per sample) inside the box and `r` the fraction of samples in it. The best
//! residue per period forms the spectrum, and the reported significance is its
//! signal detection efficiency `SDE = (max − mean) / std`.

use serde::{Deserialize, Serialize};
use tracing::debug;
use transitlab_core::{RawCandidate, SearchError, SignalSearchEngine};

use crate::config::EngineConfig;

/// Minimum samples for a meaningful fold.
pub const MIN_SAMPLES: usize = 10;

/// Grid box-least-squares engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSearch {
    period_samples: usize,
    durations_hours: Vec<f64>,
    phase_bins: usize,
}

impl Default for BoxSearch {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[derive(Debug, Clone, Copy)]
struct BoxFit {
    power: f64,
    period: f64,
    start_bin: usize,
    width_bins: usize,
    depth: f64,
}

impl BoxSearch {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            period_samples: config.period_samples.max(2),
            durations_hours: config.durations_hours.clone(),
            phase_bins: config.phase_bins.max(4),
        }
    }

    /// Trial periods between `period_min` and `period_max`, uniform in frequency.
    pub fn period_grid(&self, period_min: f64, period_max: f64) -> Vec<f64> {
        let f_lo = 1.0 / period_max;
        let f_hi = 1.0 / period_min;
        let m = self.period_samples;
        let step = (f_hi - f_lo) / (m - 1) as f64;
        (0..m).map(|k| 1.0 / (f_lo + k as f64 * step)).collect()
    }

    /// Best box at one trial period, given per-sample dips below the mean.
    fn best_box(&self, time: &[f64], dips: &[f64], t_ref: f64, period: f64) -> Option<BoxFit> {
        let nb = self.phase_bins;
        let n = time.len() as f64;

        let mut sums = vec![0.0; nb];
        let mut counts = vec![0usize; nb];
        for (t, d) in time.iter().zip(dips) {
            let phase = ((t - t_ref) / period).rem_euclid(1.0);
            let b = ((phase * nb as f64) as usize).min(nb - 1);
            sums[b] += d;
            counts[b] += 1;
        }

        // Prefix sums over two laps so windows can wrap past phase 1.0.
        let mut pre_sum = vec![0.0; 2 * nb + 1];
        let mut pre_cnt = vec![0usize; 2 * nb + 1];
        for i in 0..2 * nb {
            pre_sum[i + 1] = pre_sum[i] + sums[i % nb];
            pre_cnt[i + 1] = pre_cnt[i] + counts[i % nb];
        }

        let mut best: Option<BoxFit> = None;
        for &dur in &self.durations_hours {
            let width = ((dur / 24.0) / period * nb as f64).round() as usize;
            let width = width.clamp(1, nb / 2);
            for start in 0..nb {
                let cnt = pre_cnt[start + width] - pre_cnt[start];
                if cnt == 0 || cnt == time.len() {
                    continue;
                }
                let s = pre_sum[start + width] - pre_sum[start];
                if s <= 0.0 {
                    continue;
                }
                let r = cnt as f64 / n;
                let s_norm = s / n;
                let power = s_norm * s_norm / (r * (1.0 - r));
                if best.map_or(true, |b| power > b.power) {
                    best = Some(BoxFit {
                        power,
                        period,
                        start_bin: start,
                        width_bins: width,
                        depth: s / cnt as f64,
                    });
                }
            }
        }
        best
    }
}

impl SignalSearchEngine for BoxSearch {
    fn name(&self) -> &str {
        "box-search"
    }

    fn search(
        &self,
        time: &[f64],
        flux: &[f64],
        period_min: f64,
        period_max: f64,
    ) -> Result<RawCandidate, SearchError> {
        if time.len() != flux.len() {
            return Err(SearchError::Failed(format!(
                "time has {} samples but flux has {}",
                time.len(),
                flux.len()
            )));
        }
        if time.len() < MIN_SAMPLES {
            return Err(SearchError::InsufficientData(format!(
                "{} samples, need at least {MIN_SAMPLES}",
                time.len()
            )));
        }
        if !(period_min > 0.0 && period_min < period_max && period_max.is_finite()) {
            return Err(SearchError::InvalidRange {
                min: period_min,
                max: period_max,
            });
        }

        let t_ref = time[0];
        let baseline = time[time.len() - 1] - t_ref;
        // At least two transits must fit in the baseline.
        let period_max = period_max.min(baseline / 2.0);
        if period_max <= period_min {
            return Err(SearchError::InsufficientData(format!(
                "baseline of {baseline:.3} d holds fewer than two transits at period {period_min} d"
            )));
        }

        let mean = flux.iter().sum::<f64>() / flux.len() as f64;
        let dips: Vec<f64> = flux.iter().map(|f| mean - f).collect();

        let periods = self.period_grid(period_min, period_max);
        let mut spectrum = Vec::with_capacity(periods.len());
        let mut best: Option<BoxFit> = None;
        for &p in &periods {
            let fit = self.best_box(time, &dips, t_ref, p);
            spectrum.push(fit.map_or(0.0, |f| f.power));
            if let Some(f) = fit {
                if best.map_or(true, |b| f.power > b.power) {
                    best = Some(f);
                }
            }
        }

        let Some(fit) = best else {
            // Nothing dips below the mean anywhere: report a null detection.
            return Ok(RawCandidate {
                period: periods[0],
                duration: self.durations_hours.first().copied().unwrap_or(1.0),
                epoch: t_ref,
                depth: 0.0,
                significance: 0.0,
                radius_ratio: 0.0,
                scaled_semi_major_axis: None,
            });
        };

        let sde = signal_detection_efficiency(&spectrum);
        debug!(
            trials = periods.len(),
            period = fit.period,
            power = fit.power,
            sde,
            "box search peak"
        );

        let nb = self.phase_bins as f64;
        let centre_phase = (fit.start_bin as f64 + fit.width_bins as f64 / 2.0) / nb;
        let depth = fit.depth.max(0.0);

        Ok(RawCandidate {
            period: fit.period,
            duration: fit.width_bins as f64 / nb * fit.period * 24.0,
            epoch: t_ref + centre_phase.rem_euclid(1.0) * fit.period,
            depth,
            significance: sde,
            radius_ratio: depth.sqrt(),
            scaled_semi_major_axis: None,
        })
    }
}

/// `(max − mean) / std` of a power spectrum; zero for a flat spectrum.
pub fn signal_detection_efficiency(spectrum: &[f64]) -> f64 {
    if spectrum.is_empty() {
        return 0.0;
    }
    let n = spectrum.len() as f64;
    let mean = spectrum.iter().sum::<f64>() / n;
    let std = (spectrum.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n).sqrt();
    if std == 0.0 {
        return 0.0;
    }
    let max = spectrum.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    (max - mean) / std
}
