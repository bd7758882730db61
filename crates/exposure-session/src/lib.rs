//! Exposure Session - Consent-gated session and job orchestration.
//!
//! This crate owns the ordered session flow: consent → fingerprint
//! reveal → scan enablement → scan execution → result display → export.
//! The [`SessionController`] holds the only session state (the current
//! fingerprint and the last completed job) and enforces the cross-step
//! invariants: no scan before consent and fingerprinting complete, one
//! in-flight remote job at a time, progress always cleared on both
//! success and failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use exposure_session::{NullView, SessionController};
//!
//! let mut controller = SessionController::new(collector, client);
//! controller.gate_mut().set_phrase("I CONSENT");
//! controller.gate_mut().set_acknowledged(true);
//! controller.on_consent_granted(&mut NullView).await?;
//! controller.on_scan_requested("alice", &mut NullView).await?;
//! let artifact = controller.export_last_job(std::path::Path::new("."))?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod controller;
pub mod error;
pub mod export;
pub mod render;
pub mod view;

pub use controller::SessionController;
pub use error::{Result, SessionError};
pub use export::export_job;
pub use render::{confidence_percent, render, ResultFragment};
pub use view::{NullView, SessionView};
