//! Exposure Fingerprint - Deterministic environment fingerprinting.
//!
//! This crate derives a low-entropy device/session fingerprint from
//! ambient environment attributes. The derivation is a pure function of
//! the attribute tuple: no randomness, no salt, no persistence. A fresh
//! session recomputes the digest from current values, which may differ
//! if any contributing attribute changed.
//!
//! # Example
//!
//! ```rust
//! use exposure_core::EnvironmentConfig;
//! use exposure_fingerprint::{FingerprintCollector, HostProbe};
//!
//! let probe = HostProbe::new(EnvironmentConfig::default());
//! let fingerprint = FingerprintCollector::new(probe).collect();
//! assert_eq!(fingerprint.digest.as_str().len(), 64);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod collector;
pub mod probe;

pub use collector::{Fingerprint, FingerprintCollector, SEED_SEPARATOR};
pub use probe::{EnvironmentAttributes, EnvironmentProbe, HostProbe};
