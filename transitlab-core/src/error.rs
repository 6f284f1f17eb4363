//! Error taxonomy for the transit core.

use thiserror::Error;

use crate::search::SearchError;

/// Errors from detection, derivation, and layout.
///
/// Parameter problems are rejected before any work begins. Failures during
/// the detection loop carry how many candidates had already been accepted.
#[derive(Debug, Error)]
pub enum TransitError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("search engine failed after {found} candidate(s): {source}")]
    SearchEngineFailure {
        found: usize,
        #[source]
        source: SearchError,
    },

    #[error("progress sink failed after {found} candidate(s): {source}")]
    ProgressSinkFailure {
        found: usize,
        #[source]
        source: ProgressError,
    },

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("ingestion error: {0}")]
    Ingestion(String),
}

impl TransitError {
    /// Number of candidates accepted before a mid-run failure, if any.
    pub fn candidates_found(&self) -> Option<usize> {
        match self {
            Self::SearchEngineFailure { found, .. } | Self::ProgressSinkFailure { found, .. } => {
                Some(*found)
            }
            _ => None,
        }
    }
}

/// Raised by a progress sink that can no longer accept notifications.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ProgressError(pub String);
