//! Error types for the advisory map.

use thiserror::Error;

/// Result type alias using AdvisoryError.
pub type AdvisoryResult<T> = Result<T, AdvisoryError>;

/// Primary error type for advisory acquisition and region loading.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    // === Acquisition Errors ===
    #[error("Advisory acquisition failed: {0}")]
    Acquisition(String),

    #[error("Unexpected status code from advisory feed: {0}")]
    UnexpectedStatus(u16),

    #[error("Malformed advisory response: {0}")]
    MalformedResponse(String),

    // === Region Errors ===
    #[error("Invalid region boundary data: {0}")]
    RegionSource(String),

    #[error("Duplicate region name in registry: {0}")]
    DuplicateRegion(String),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdvisoryError {
    /// Whether this error aborted a data acquisition (as opposed to setup).
    pub fn is_acquisition(&self) -> bool {
        matches!(
            self,
            AdvisoryError::Acquisition(_)
                | AdvisoryError::UnexpectedStatus(_)
                | AdvisoryError::MalformedResponse(_)
        )
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AdvisoryError::Acquisition(_)
            | AdvisoryError::UnexpectedStatus(_)
            | AdvisoryError::MalformedResponse(_) => 502,

            AdvisoryError::RegionSource(_)
            | AdvisoryError::DuplicateRegion(_)
            | AdvisoryError::Config(_) => 400,

            AdvisoryError::Internal(_) => 500,
        }
    }
}

impl From<std::io::Error> for AdvisoryError {
    fn from(err: std::io::Error) -> Self {
        AdvisoryError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AdvisoryError {
    fn from(err: serde_json::Error) -> Self {
        AdvisoryError::MalformedResponse(format!("JSON error: {}", err))
    }
}
