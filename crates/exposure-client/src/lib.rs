//! Exposure Client - HTTP client for the remote scanning service.
//!
//! This crate issues the three network operations against a configured
//! base endpoint: `collect` (fingerprint submission), `osint-scan`
//! (query + owner token), and `simulate-tracking` (owner-keyed report).
//! Every call is bounded by a timeout, and timeouts are reported as a
//! failure kind distinct from other transport errors.
//!
//! Retry policy: the idempotent `simulate-tracking` read gets a bounded
//! retry with exponential backoff; `collect` and `osint-scan` are never
//! retried, since a silent duplicate could double billable work on the
//! remote side.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod client;
pub mod error;

pub use client::RemoteJobClient;
pub use error::{ClientError, Result};
