//! Error types for snipmark-core.

use thiserror::Error;

use crate::types::SurfaceId;

/// Result type alias using snipmark-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for snipmark operations
///
/// A snippet that cannot be found, or a match that cannot be wrapped in a single
/// mark, are normal outcomes and live in
/// [`RelocationOutcome`](crate::relocator::RelocationOutcome), not here.
#[derive(Error, Debug)]
pub enum Error {
    // Backend errors
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Backend error {status}: {body}")]
    Backend { status: u16, body: String },

    // Surface errors
    #[error("Surface {0} is gone")]
    StaleTarget(SurfaceId),

    #[error("No page registered for address: {0}")]
    SurfaceNotFound(String),

    #[error("No active surface")]
    NoActiveSurface,

    #[error("Orchestrator is not running")]
    OrchestratorClosed,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a non-success backend response
    pub fn backend(status: u16, body: impl Into<String>) -> Self {
        Self::Backend {
            status,
            body: body.into(),
        }
    }

    /// Whether this error came from talking to the backend.
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_) | Self::Backend { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Serialization(e.to_string())
        } else {
            Error::BackendUnavailable(e.to_string())
        }
    }
}
