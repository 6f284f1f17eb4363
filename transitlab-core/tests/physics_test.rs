//! Derivation and layout against closed-form expectations.

use std::f64::consts::PI;

use transitlab_core::physics::constants::{
    AU_M, EARTH_RADIUS_M, FALLBACK_STELLAR_DENSITY, G, SECONDS_PER_DAY, SOLAR_MASS_KG,
};
use transitlab_core::physics::{round_to, semi_major_axis_m, stellar_radius_m};
use transitlab_core::{derive, layout, DensitySource, RawCandidate, TransitError};

fn raw(period: f64, radius_ratio: f64, a: Option<f64>) -> RawCandidate {
    RawCandidate {
        period,
        duration: 2.5,
        epoch: 100.0,
        depth: radius_ratio * radius_ratio,
        significance: 11.234,
        radius_ratio,
        scaled_semi_major_axis: a,
    }
}

#[test]
fn fallback_density_matches_closed_form_radius() {
    let out = derive(&[raw(4.2, 0.1, None)], 1.0).unwrap();

    let r_star = ((3.0 * SOLAR_MASS_KG) / (4.0 * PI * FALLBACK_STELLAR_DENSITY)).cbrt();
    let expected = round_to(0.1 * r_star / EARTH_RADIUS_M, 2);

    assert_eq!(out[0].density_source, DensitySource::Fallback);
    assert_eq!(out[0].radius_earth, expected);
    assert!((stellar_radius_m(1.0, FALLBACK_STELLAR_DENSITY) - r_star).abs() < 1e-3);
}

#[test]
fn fitted_axis_matches_closed_form_radius() {
    let (period, a, mass) = (9.0, 18.5, 0.8);
    let out = derive(&[raw(period, 0.05, Some(a))], mass).unwrap();

    let p = period * SECONDS_PER_DAY;
    let rho = 3.0 * PI / (G * p * p) * a.powi(3);
    let r_star = ((3.0 * mass * SOLAR_MASS_KG) / (4.0 * PI * rho)).cbrt();
    let expected = round_to(0.05 * r_star / EARTH_RADIUS_M, 2);

    assert_eq!(out[0].density_source, DensitySource::Transit);
    assert_eq!(out[0].radius_earth, expected);
}

#[test]
fn presentation_rounding_contract() {
    let c = RawCandidate {
        period: 12.345678,
        duration: 2.34567,
        epoch: 0.0,
        depth: 0.00081,
        significance: 7.456,
        radius_ratio: 0.0285,
        scaled_semi_major_axis: None,
    };
    let out = derive(&[c], 1.0).unwrap();
    assert_eq!(out[0].period, 12.3457);
    assert_eq!(out[0].depth_ppm, 810.00);
    assert_eq!(out[0].duration_hours, 2.346);
    assert_eq!(out[0].significance, 7.46);
}

#[test]
fn presentation_rounding_breaks_exact_ties_to_even() {
    let c = RawCandidate {
        period: 3.0,
        duration: 2.0625,
        epoch: 0.0,
        depth: 0.000125,
        significance: 7.125,
        radius_ratio: 0.02,
        scaled_semi_major_axis: None,
    };
    let out = derive(&[c], 1.0).unwrap();
    assert_eq!(out[0].duration_hours, 2.062);
    assert_eq!(out[0].significance, 7.12);
    assert_eq!(out[0].depth_ppm, 125.0);
}

#[test]
fn derive_preserves_order_and_length() {
    let input: Vec<RawCandidate> = [5.0, 1.5, 40.0, 12.0]
        .iter()
        .map(|&p| raw(p, 0.02, None))
        .collect();
    let out = derive(&input, 1.1).unwrap();
    assert_eq!(out.len(), input.len());
    for (i, (p, r)) in out.iter().zip(&input).enumerate() {
        assert_eq!(p.label, format!("Planet {}", i + 1));
        assert_eq!(p.period, round_to(r.period, 4));
    }
}

#[test]
fn derive_rejects_negative_mass() {
    let err = derive(&[raw(3.0, 0.1, None)], -1.0).unwrap_err();
    assert!(matches!(err, TransitError::InvalidParameter(_)));
}

#[test]
fn derive_rejects_degenerate_geometry() {
    let err = derive(&[raw(3.0, 0.1, Some(0.0))], 1.0).unwrap_err();
    assert!(matches!(err, TransitError::InvalidParameter(_)));
}

#[test]
fn layout_single_candidate_sits_on_axis() {
    let points = layout(&[raw(10.0, 0.05, None)], 1.0).unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].vertical_offset, 0.0);
}

#[test]
fn layout_three_candidates_are_staggered() {
    let input = [raw(10.0, 0.05, None), raw(3.0, 0.02, None), raw(60.0, 0.08, None)];
    let points = layout(&input, 1.0).unwrap();
    let offsets: Vec<f64> = points.iter().map(|p| p.vertical_offset).collect();
    assert_eq!(offsets, vec![-0.25, 0.0, 0.25]);
    let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Planet 1", "Planet 2", "Planet 3"]);

    let planets = derive(&input, 1.0).unwrap();
    for (point, planet) in points.iter().zip(&planets) {
        assert_eq!(point.label, planet.label);
    }
}

#[test]
fn layout_distance_follows_kepler() {
    let points = layout(&[raw(10.0, 0.05, None)], 2.0).unwrap();

    let p = 10.0 * SECONDS_PER_DAY;
    let a = (G * 2.0 * SOLAR_MASS_KG * p * p / (4.0 * PI * PI)).cbrt() / AU_M;
    assert!((points[0].semi_major_axis_au - a).abs() < 1e-12);
}

#[test]
fn layout_uses_the_unrounded_period() {
    // Rounds to 2.4691 in the summary table.
    let period = 2.469_137;
    let points = layout(&[raw(period, 0.05, None)], 1.0).unwrap();

    let exact = semi_major_axis_m(period, 1.0) / AU_M;
    let from_table = semi_major_axis_m(round_to(period, 4), 1.0) / AU_M;
    assert_eq!(points[0].semi_major_axis_au, exact);
    assert_ne!(points[0].semi_major_axis_au, from_table);
}

#[test]
fn layout_rejects_non_positive_period() {
    let err = layout(&[raw(0.0, 0.05, None)], 1.0).unwrap_err();
    assert!(matches!(err, TransitError::InvalidParameter(_)));
}

#[test]
fn layout_of_nothing_is_an_error() {
    assert!(matches!(layout(&[], 1.0), Err(TransitError::EmptyInput(_))));
}
