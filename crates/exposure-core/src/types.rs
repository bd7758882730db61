//! Shared types used across the Exposure client.
//!
//! This module defines the validated newtypes and the wire contracts
//! exchanged with the remote scanning service. Wire field names are part
//! of the service contract and must not change.

use crate::error::ExposureError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Newtype for SHA-256 hex digests with validation.
///
/// Digests must be exactly 64 lowercase hexadecimal characters. The
/// fingerprint digest doubles as the session's owner token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexDigest(String);

impl HexDigest {
    /// Create a new `HexDigest` from a string.
    ///
    /// # Errors
    /// Returns error if the value is not 64 lowercase hex characters.
    pub fn new(digest: impl Into<String>) -> Result<Self, ExposureError> {
        let digest = digest.into();
        Self::validate(&digest)?;
        Ok(Self(digest))
    }

    /// Wrap a digest produced by the hasher, which is valid by construction.
    pub(crate) fn from_hasher(digest: String) -> Self {
        Self(digest)
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that a string is a 64-character lowercase hex digest.
    fn validate(digest: &str) -> Result<(), ExposureError> {
        static DIGEST_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex =
            DIGEST_REGEX.get_or_init(|| Regex::new(r"^[0-9a-f]{64}$").expect("valid regex"));

        if regex.is_match(digest) {
            Ok(())
        } else {
            Err(ExposureError::Validation(format!(
                "invalid digest: must be 64 lowercase hex characters, got '{digest}'"
            )))
        }
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from a `DateTime<Utc>`.
    #[must_use]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the inner `DateTime<Utc>`.
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Format as an ISO-8601 string truncated to whole seconds
    /// (`YYYY-MM-DDTHH:MM:SS`, 19 characters). Used for export filenames.
    #[must_use]
    pub fn to_iso8601_seconds(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Screen metrics as the `collect` endpoint expects them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenMetrics {
    /// Screen width in pixels
    pub width: u32,
    /// Screen height in pixels
    pub height: u32,
    /// Device pixel ratio
    pub pr: f64,
}

/// Payload sent to the remote `collect` endpoint.
///
/// Carries both the derived digest and the raw attributes it was
/// derived from. Keys are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectPayload {
    /// Derived fingerprint digest
    pub fingerprint: HexDigest,
    /// Canonical seed the digest was computed from
    pub fingerprint_seed: String,
    /// Raw user-agent string
    pub user_agent: String,
    /// Language tag
    pub language: String,
    /// Screen metrics
    pub screen: ScreenMetrics,
    /// IANA timezone name
    pub timezone: String,
}

/// Request body for the `osint-scan` endpoint.
///
/// `owner` is always the session fingerprint digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Trimmed, non-empty search query
    pub query: String,
    /// Owner token (fingerprint digest)
    pub owner: String,
}

/// A single match returned by the scanning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Platform the match was found on
    pub platform: String,
    /// Kind of match (e.g. "exact", "fuzzy")
    pub match_type: String,
    /// Confidence in [0,1]; the service may omit it or send junk,
    /// so rendering clamps defensively
    #[serde(default)]
    pub confidence: f64,
    /// Outbound link to the match
    pub url: String,
    /// Optional content snippet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Response entity for a scan job.
///
/// Either `results` is populated or `error` carries a service-reported
/// message; an error response still replaces the session's last job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanJob {
    /// Query the job was run for
    #[serde(default)]
    pub query: String,
    /// Ordered matches
    #[serde(default)]
    pub results: Vec<ResultItem>,
    /// Service-reported error message, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanJob {
    /// Whether the service reported an error for this job.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// The single most recently received remote job response.
///
/// Held in memory only, overwritten on each new response, and the sole
/// source for export. Serializes as the inner response unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JobRecord {
    /// An OSINT scan response
    Scan(ScanJob),
    /// A tracking-simulation report (arbitrary JSON)
    Simulation(serde_json::Value),
}

impl JobRecord {
    /// Token used in export filenames: the scan query, or a fixed
    /// fallback for simulation reports.
    #[must_use]
    pub fn export_token(&self) -> &str {
        match self {
            Self::Scan(job) if !job.query.is_empty() => &job.query,
            Self::Scan(_) => "scan",
            Self::Simulation(_) => "simulation",
        }
    }
}
