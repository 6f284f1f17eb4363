//! Physical interpretation of detections.
//!
//! - `constants`: SI values shared by every conversion
//! - `derive`: transit statistics → stellar density, stellar radius, planet radius
//! - `layout`: period → orbital distance and schematic placement

pub mod constants;
pub mod derive;
pub mod layout;

pub use derive::{derive, planet_radius_earth, stellar_density, stellar_radius_m};
pub use layout::{axis_extent_au, layout, semi_major_axis_m, vertical_offsets};

use crate::error::TransitError;

/// Round to `places` decimal places, ties to even on the exact binary value.
///
/// `2.0625` rounds to `2.062` at three places, while `2.675` (stored just
/// below the tie) rounds to `2.67` at two.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    let scaled = value * scale;
    if (scaled - scaled.trunc()).abs() == 0.5 {
        // The product may have been rounded onto the tie; the fused
        // residual says which side the exact product lies on.
        let residual = value.mul_add(scale, -scaled);
        if residual > 0.0 {
            return scaled.ceil() / scale;
        }
        if residual < 0.0 {
            return scaled.floor() / scale;
        }
    }
    scaled.round_ties_even() / scale
}

/// Reject non-finite or non-positive stellar masses.
pub(crate) fn check_stellar_mass(stellar_mass: f64) -> Result<(), TransitError> {
    if stellar_mass.is_finite() && stellar_mass > 0.0 {
        Ok(())
    } else {
        Err(TransitError::InvalidParameter(format!(
            "stellar mass must be positive, got {stellar_mass}"
        )))
    }
}
