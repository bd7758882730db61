//! Exposure Core - Foundation crate for the Exposure client.
//!
//! This crate provides the shared types, error handling, configuration
//! management, and digest helper that all other Exposure crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and wire contracts (`HexDigest`, `Timestamp`, `ScanJob`)
//! - [`digest`] - SHA-256 hex digest helper
//!
//! # Example
//!
//! ```rust
//! use exposure_core::digest::sha256_hex;
//!
//! let digest = sha256_hex("abc");
//! assert_eq!(digest.as_str().len(), 64);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod digest;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, EnvironmentConfig, ServiceConfig};
pub use digest::sha256_hex;
pub use error::{ConfigError, ConfigResult, ExposureError, Result};
pub use types::{
    CollectPayload, HexDigest, JobRecord, ResultItem, ScanJob, ScanRequest, ScreenMetrics,
    Timestamp,
};
