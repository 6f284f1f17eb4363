//! Orbital schematic placement.
//!
//! Positions only: distance from the star along one axis and a small vertical
//! stagger so labels do not collide. The star sits at distance 0.

use std::f64::consts::PI;

use super::check_stellar_mass;
use super::constants::{AU_M, G, SECONDS_PER_DAY, SOLAR_MASS_KG};
use super::derive::planet_label;
use crate::domain::{RawCandidate, SchematicPoint};
use crate::error::TransitError;

/// Half-height of the vertical stagger band.
pub const STAGGER_HALF_HEIGHT: f64 = 0.25;

/// Semi-major axis in metres from Kepler's third law.
pub fn semi_major_axis_m(period_days: f64, stellar_mass: f64) -> f64 {
    let p = period_days * SECONDS_PER_DAY;
    let m = stellar_mass * SOLAR_MASS_KG;
    (G * m * p * p / (4.0 * PI * PI)).cbrt()
}

/// `n` offsets evenly spaced over `[-0.25, 0.25]`; a lone body sits at 0.
pub fn vertical_offsets(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = 2.0 * STAGGER_HALF_HEIGHT / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        STAGGER_HALF_HEIGHT
                    } else {
                        -STAGGER_HALF_HEIGHT + i as f64 * step
                    }
                })
                .collect()
        }
    }
}

/// Place every candidate at its orbital distance in AU, in input order.
///
/// Distances come from the unrounded detected period; labels match the ones
/// `derive` gives the same candidates.
pub fn layout(
    candidates: &[RawCandidate],
    stellar_mass: f64,
) -> Result<Vec<SchematicPoint>, TransitError> {
    if candidates.is_empty() {
        return Err(TransitError::EmptyInput(
            "no candidates to place in schematic".into(),
        ));
    }
    check_stellar_mass(stellar_mass)?;

    if let Some((i, c)) = candidates
        .iter()
        .enumerate()
        .find(|(_, c)| !(c.period.is_finite() && c.period > 0.0))
    {
        return Err(TransitError::InvalidParameter(format!(
            "candidate {} has non-positive period {}",
            i + 1,
            c.period
        )));
    }

    let offsets = vertical_offsets(candidates.len());
    Ok(candidates
        .iter()
        .zip(offsets)
        .enumerate()
        .map(|(i, (c, y))| SchematicPoint {
            label: planet_label(i),
            semi_major_axis_au: semi_major_axis_m(c.period, stellar_mass) / AU_M,
            vertical_offset: y,
        })
        .collect())
}

/// Right edge of a schematic axis that leaves room for the outermost label.
pub fn axis_extent_au(points: &[SchematicPoint]) -> f64 {
    let max_a = points
        .iter()
        .map(|p| p.semi_major_axis_au)
        .fold(0.0_f64, f64::max);
    max_a * 1.15 + 0.05
}

impl SchematicPoint {
    /// Short annotation for the `index`-th (1-based) body, e.g. `P1  0.05 AU`.
    pub fn annotation(&self, index: usize) -> String {
        format!("P{index}  {:.2} AU", self.semi_major_axis_au)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(period: f64) -> RawCandidate {
        RawCandidate {
            period,
            duration: 3.0,
            epoch: 0.0,
            depth: 0.0005,
            significance: 10.0,
            radius_ratio: 0.022,
            scaled_semi_major_axis: None,
        }
    }

    #[test]
    fn earth_year_is_one_au() {
        let a = semi_major_axis_m(365.256_363, 1.0) / AU_M;
        assert!((a - 1.0).abs() < 1e-3, "a = {a}");
    }

    #[test]
    fn offsets_for_common_counts() {
        assert_eq!(vertical_offsets(1), vec![0.0]);
        assert_eq!(vertical_offsets(2), vec![-0.25, 0.25]);
        assert_eq!(vertical_offsets(3), vec![-0.25, 0.0, 0.25]);
        assert_eq!(vertical_offsets(5), vec![-0.25, -0.125, 0.0, 0.125, 0.25]);
    }

    #[test]
    fn layout_keeps_order_and_labels() {
        let points = layout(&[raw(30.0), raw(3.0)], 1.0).unwrap();
        assert_eq!(points[0].label, "Planet 1");
        assert_eq!(points[1].label, "Planet 2");
        assert!(points[0].semi_major_axis_au > points[1].semi_major_axis_au);
    }

    #[test]
    fn empty_layout_is_an_error() {
        assert!(matches!(layout(&[], 1.0), Err(TransitError::EmptyInput(_))));
    }

    #[test]
    fn layout_rejects_zero_mass() {
        assert!(matches!(
            layout(&[raw(3.0)], 0.0),
            Err(TransitError::InvalidParameter(_))
        ));
    }

    #[test]
    fn axis_extent_pads_outermost_body() {
        let points = vec![SchematicPoint {
            label: "Planet 1".into(),
            semi_major_axis_au: 1.0,
            vertical_offset: 0.0,
        }];
        assert!((axis_extent_au(&points) - 1.2).abs() < 1e-12);
        assert_eq!(points[0].annotation(1), "P1  1.00 AU");
    }
}
