//! Detection records: raw engine output and its physical interpretation.

use serde::{Deserialize, Serialize};

/// One best-fit periodic transit signal as reported by a search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Orbital period in days.
    pub period: f64,
    /// Transit duration in hours.
    pub duration: f64,
    /// Mid-transit reference time, same units as the series time axis.
    pub epoch: f64,
    /// Fractional depth (0–1).
    pub depth: f64,
    /// Signal detection efficiency.
    pub significance: f64,
    /// Planet radius over stellar radius.
    pub radius_ratio: f64,
    /// Semi-major axis in stellar radii, when the engine fitted one.
    #[serde(default)]
    pub scaled_semi_major_axis: Option<f64>,
}

impl RawCandidate {
    /// Check that the fields the detector relies on are usable.
    ///
    /// Returns a description of the first problem found.
    pub fn check_usable(&self) -> Result<(), String> {
        if !self.significance.is_finite() {
            return Err(format!("significance is not finite ({})", self.significance));
        }
        if !(self.period.is_finite() && self.period > 0.0) {
            return Err(format!("period must be positive, got {}", self.period));
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(format!("duration must be positive, got {}", self.duration));
        }
        if !self.epoch.is_finite() {
            return Err(format!("epoch is not finite ({})", self.epoch));
        }
        Ok(())
    }
}

/// Host star properties needed for physical interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StellarParameters {
    /// Stellar mass in solar masses.
    pub mass: f64,
}

impl Default for StellarParameters {
    /// Solar-mass star, the fallback used when no catalog value is available.
    fn default() -> Self {
        Self { mass: 1.0 }
    }
}

/// Where the stellar density behind a planet radius came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensitySource {
    /// Derived from the fitted scaled semi-major axis and the period.
    Transit,
    /// Solar-like default density.
    #[default]
    Fallback,
}

/// A detection expressed in presentation units, rounded for display.
///
/// Serialized field names are the summary table column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetCandidate {
    #[serde(rename = "Planet")]
    pub label: String,
    #[serde(rename = "Period[d]")]
    pub period: f64,
    #[serde(rename = "Depth[ppm]")]
    pub depth_ppm: f64,
    #[serde(rename = "Duration[h]")]
    pub duration_hours: f64,
    #[serde(rename = "Radius[R_earth]")]
    pub radius_earth: f64,
    #[serde(rename = "SDE")]
    pub significance: f64,
    #[serde(default)]
    pub density_source: DensitySource,
}

/// Position of one detected body in the orbital schematic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicPoint {
    pub label: String,
    pub semi_major_axis_au: f64,
    pub vertical_offset: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawCandidate {
        RawCandidate {
            period: 3.5,
            duration: 2.4,
            epoch: 1.2,
            depth: 0.001,
            significance: 9.0,
            radius_ratio: 0.03,
            scaled_semi_major_axis: None,
        }
    }

    #[test]
    fn usable_candidate_passes() {
        assert!(sample().check_usable().is_ok());
    }

    #[test]
    fn nan_significance_is_unusable() {
        let mut c = sample();
        c.significance = f64::NAN;
        assert!(c.check_usable().is_err());
    }

    #[test]
    fn zero_period_is_unusable() {
        let mut c = sample();
        c.period = 0.0;
        assert!(c.check_usable().unwrap_err().contains("period"));
    }

    #[test]
    fn planet_candidate_uses_table_column_names() {
        let p = PlanetCandidate {
            label: "Planet 1".into(),
            period: 3.5,
            depth_ppm: 1000.0,
            duration_hours: 2.4,
            radius_earth: 3.27,
            significance: 9.0,
            density_source: DensitySource::Fallback,
        };
        let json = serde_json::to_value(&p).unwrap();
        for key in ["Planet", "Period[d]", "Depth[ppm]", "Duration[h]", "Radius[R_earth]", "SDE"] {
            assert!(json.get(key).is_some(), "missing column {key}");
        }
    }

    #[test]
    fn missing_scaled_axis_deserializes_as_none() {
        let json = r#"{"period":1.0,"duration":1.0,"epoch":0.0,"depth":0.01,
                       "significance":7.0,"radius_ratio":0.1}"#;
        let c: RawCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(c.scaled_semi_major_axis, None);
    }
}
