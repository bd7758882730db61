//! Client error types.

use thiserror::Error;

/// Errors from remote service calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The call exceeded the configured timeout
    #[error("request to {operation} timed out")]
    Timeout {
        /// Operation that timed out
        operation: &'static str,
    },

    /// Transport-level failure (DNS, connection, TLS)
    #[error("network error during {operation}: {message}")]
    Network {
        /// Operation that failed
        operation: &'static str,
        /// Underlying failure description
        message: String,
    },

    /// Non-success HTTP status from the service
    #[error("{operation} failed with HTTP {status}: {message}")]
    Http {
        /// Operation that failed
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body, if readable
        message: String,
    },

    /// Response body was not the expected JSON shape
    #[error("failed to parse {operation} response: {message}")]
    Parse {
        /// Operation whose response failed to parse
        operation: &'static str,
        /// Parse failure description
        message: String,
    },

    /// HTTP client construction failed
    #[error("internal client error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Map a reqwest error, distinguishing timeout from other transport
    /// failures.
    pub(crate) fn from_reqwest(operation: &'static str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { operation }
        } else {
            Self::Network {
                operation,
                message: err.to_string(),
            }
        }
    }

    /// Map an error from consuming the response body. The configured
    /// timeout can fire mid-read, so timeout still takes precedence
    /// over a decode failure.
    pub(crate) fn from_body(operation: &'static str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { operation }
        } else {
            Self::Parse {
                operation,
                message: err.to_string(),
            }
        }
    }

    /// Whether a retry could plausibly succeed (transport failures,
    /// timeouts, and server-side 5xx responses).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            Self::Parse { .. } | Self::Internal(_) => false,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
