//! Transit window membership.

/// True when `t` lies within half a transit duration of a predicted mid-transit time.
///
/// `period` and `t`/`epoch` are in days; `duration_hours` is the full transit
/// duration in hours. The boundary (distance exactly half the duration) counts
/// as in-transit.
pub fn in_transit(t: f64, period: f64, duration_hours: f64, epoch: f64) -> bool {
    let half_width = duration_hours / 24.0 / 2.0;
    let phase = (t - epoch + 0.5 * period).rem_euclid(period) - 0.5 * period;
    phase.abs() <= half_width
}

/// In-transit flag for every sample of `time`.
pub fn transit_mask(time: &[f64], period: f64, duration_hours: f64, epoch: f64) -> Vec<bool> {
    time.iter()
        .map(|&t| in_transit(t, period, duration_hours, epoch))
        .collect()
}
