//! Exposure Consent - Consent gate for data-leaving-the-device actions.
//!
//! Nothing is fingerprinted, collected, or scanned until the user has
//! typed the exact confirmation phrase and checked the acknowledgment
//! control. Consent is session-local: it is never persisted and must be
//! re-established on every run.
//!
//! # Example
//!
//! ```rust
//! use exposure_consent::{ConsentGate, ConsentState};
//!
//! let mut gate = ConsentGate::new();
//! gate.set_phrase(" i consent ");
//! gate.set_acknowledged(true);
//! assert_eq!(gate.state(), ConsentState::Eligible);
//! gate.grant().expect("eligible gate grants");
//! assert_eq!(gate.state(), ConsentState::Granted);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod gate;

pub use gate::{ConsentGate, ConsentState, CONSENT_PHRASE};

use thiserror::Error;

/// Errors that can occur during consent operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsentError {
    /// Grant attempted before the eligibility condition holds
    #[error("consent not eligible: type the exact phrase '{CONSENT_PHRASE}' and check the acknowledgment")]
    NotEligible,

    /// Grant attempted when consent was already recorded
    #[error("consent already granted for this session")]
    AlreadyGranted,
}

/// Result type for consent operations.
pub type Result<T> = std::result::Result<T, ConsentError>;
