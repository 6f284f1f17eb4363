//! Domain types for TransitLab.

pub mod candidate;
pub mod series;

pub use candidate::{
    DensitySource, PlanetCandidate, RawCandidate, SchematicPoint, StellarParameters,
};
pub use series::TimeSeries;
