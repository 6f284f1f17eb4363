//! TransitLab Core: iterative transit detection and physical interpretation.
//!
//! This crate contains the heart of the transit search:
//! - Domain types (time series, raw candidates, planet candidates, schematic points)
//! - The `SignalSearchEngine` seam for the periodogram statistic
//! - The iterative detect-and-suppress loop
//! - Closed-form conversion from transit statistics to physical quantities
//! - One-dimensional schematic layout of detected bodies

pub mod detect;
pub mod domain;
pub mod error;
pub mod physics;
pub mod search;

pub use detect::{
    detect, in_transit, transit_mask, DetectionParams, DetectionProgress, LogProgress,
};
pub use domain::{
    DensitySource, PlanetCandidate, RawCandidate, SchematicPoint, StellarParameters, TimeSeries,
};
pub use error::{ProgressError, TransitError};
pub use physics::{derive, layout};
pub use search::{SearchError, SignalSearchEngine};
