//! Physical constants (SI). CODATA 2018 / IAU 2015 nominal values.

/// Newtonian constant of gravitation, m³ kg⁻¹ s⁻².
pub const G: f64 = 6.674_30e-11;

/// Solar mass, kg.
pub const SOLAR_MASS_KG: f64 = 1.988_409_870_698_051e30;

/// Earth radius used for planet radii, m.
pub const EARTH_RADIUS_M: f64 = 6.371e6;

/// Astronomical unit, m.
pub const AU_M: f64 = 1.495_978_707e11;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Stellar density assumed when no scaled semi-major axis was fitted, kg/m³.
pub const FALLBACK_STELLAR_DENSITY: f64 = 1408.0;
