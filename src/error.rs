//! Error types for annex.

use thiserror::Error;

/// Result type for annex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for annex operations.
///
/// Alignment failures are deliberately *not* represented here: a fragment
/// that cannot be located in its document resolves to
/// [`AlignmentStatus::Unresolved`](crate::AlignmentStatus::Unresolved),
/// which is data, not an error.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Malformed example data or invalid annotate input, detected eagerly.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The external extraction capability failed (network, auth, timeout,
    /// malformed upstream response). Retry policy belongs to the caller.
    #[error("Extraction oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// An append was attempted after grouping froze the document.
    #[error("Document is frozen: {0}")]
    DocumentFrozen(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create an oracle-unavailable error.
    pub fn oracle_unavailable(msg: impl Into<String>) -> Self {
        Error::OracleUnavailable(msg.into())
    }

    /// Create a frozen-document error.
    pub fn document_frozen(msg: impl Into<String>) -> Self {
        Error::DocumentFrozen(msg.into())
    }
}
