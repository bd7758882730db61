//! Session error types.
//!
//! The taxonomy mirrors how errors reach the user: validation errors are
//! synchronous and never touch the network, transport errors come back
//! from the client, and service errors arrive inside a well-formed
//! response. All of them are terminal for the current action only; the
//! session stays usable.

use exposure_consent::ConsentError;
use thiserror::Error;

/// Errors surfaced by the session controller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Input validation failed before any network attempt
    #[error("{0}")]
    Validation(String),

    /// Consent gate rejected the transition
    #[error(transparent)]
    Consent(#[from] ConsentError),

    /// Transport-level failure from the remote job client
    #[error(transparent)]
    Client(#[from] exposure_client::ClientError),

    /// The service returned a well-formed response carrying an error
    #[error("service error: {0}")]
    Service(String),

    /// Export serialization failed
    #[error("failed to serialize job for export: {0}")]
    Json(#[from] serde_json::Error),

    /// Export file write failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    /// Whether this is a synchronous input-validation error (no network
    /// attempt was made).
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
