//! Raw detections → physically interpreted planet candidates.

use std::f64::consts::PI;

use tracing::debug;

use super::constants::{
    EARTH_RADIUS_M, FALLBACK_STELLAR_DENSITY, G, SECONDS_PER_DAY, SOLAR_MASS_KG,
};
use super::{check_stellar_mass, round_to};
use crate::domain::{DensitySource, PlanetCandidate, RawCandidate};
use crate::error::TransitError;

/// Stellar density in kg/m³ implied by a transit.
///
/// With a fitted `a/R★`, Kepler's third law gives `ρ★ = 3π (a/R★)³ / (G P²)`.
/// Without one the solar-like fallback is used.
pub fn stellar_density(
    period_days: f64,
    scaled_semi_major_axis: Option<f64>,
) -> Result<(f64, DensitySource), TransitError> {
    let Some(a_over_rs) = scaled_semi_major_axis else {
        return Ok((FALLBACK_STELLAR_DENSITY, DensitySource::Fallback));
    };

    let p_sec = period_days * SECONDS_PER_DAY;
    let rho = 3.0 * PI / (G * p_sec * p_sec) * a_over_rs.powi(3);
    if !(rho.is_finite() && rho > 0.0) {
        return Err(TransitError::InvalidParameter(format!(
            "degenerate geometry: stellar density {rho} from a/R* = {a_over_rs}, P = {period_days} d"
        )));
    }
    Ok((rho, DensitySource::Transit))
}

/// Stellar radius in metres for a star of `stellar_mass` (solar masses) and density `rho`.
pub fn stellar_radius_m(stellar_mass: f64, rho: f64) -> f64 {
    let m_star = stellar_mass * SOLAR_MASS_KG;
    ((3.0 * m_star) / (4.0 * PI * rho)).cbrt()
}

/// Planet radius in Earth radii for a radius ratio around a star of radius `r_star_m`.
pub fn planet_radius_earth(radius_ratio: f64, r_star_m: f64) -> f64 {
    radius_ratio * r_star_m / EARTH_RADIUS_M
}

/// Ordinal label shared by the summary table and the schematic.
pub(crate) fn planet_label(index: usize) -> String {
    format!("Planet {}", index + 1)
}

/// Convert every raw candidate into a rounded `PlanetCandidate`, preserving order.
///
/// An empty input yields an empty output. Labels are `Planet 1`, `Planet 2`, ...
pub fn derive(
    candidates: &[RawCandidate],
    stellar_mass: f64,
) -> Result<Vec<PlanetCandidate>, TransitError> {
    check_stellar_mass(stellar_mass)?;

    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if !(c.period.is_finite() && c.period > 0.0) {
                return Err(TransitError::InvalidParameter(format!(
                    "candidate {} has non-positive period {}",
                    i + 1,
                    c.period
                )));
            }
            let (rho, density_source) = stellar_density(c.period, c.scaled_semi_major_axis)?;
            let r_star = stellar_radius_m(stellar_mass, rho);
            let radius_earth = planet_radius_earth(c.radius_ratio, r_star);
            debug!(
                candidate = i + 1,
                rho,
                r_star,
                ?density_source,
                "derived stellar parameters"
            );

            Ok(PlanetCandidate {
                label: planet_label(i),
                period: round_to(c.period, 4),
                depth_ppm: round_to(c.depth * 1e6, 2),
                duration_hours: round_to(c.duration, 3),
                radius_earth: round_to(radius_earth, 2),
                significance: round_to(c.significance, 2),
                density_source,
            })
        })
        .collect()
}
