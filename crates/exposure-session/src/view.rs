//! UI seam for session effects.

use crate::render::ResultFragment;
use exposure_fingerprint::Fingerprint;

/// Receiver for the session's user-visible effects.
///
/// The controller drives this trait in a fixed order: controls are
/// locked before any network work starts (so double submission is
/// impossible), and progress is always cleared whether a job succeeded
/// or failed. Front ends implement it to draw; tests implement it to
/// record.
pub trait SessionView {
    /// The consent control was disabled to prevent re-entry.
    fn consent_locked(&mut self) {}

    /// The fingerprint summary became visible.
    fn fingerprint_revealed(&mut self, _fingerprint: &Fingerprint) {}

    /// The scan and simulation triggers became actionable.
    fn scan_unlocked(&mut self) {}

    /// Progress indicator update (0–100).
    fn progress(&mut self, _percent: u8) {}

    /// Progress indicator reset/hidden.
    fn progress_cleared(&mut self) {}

    /// A dismissible, non-fatal error message.
    fn show_error(&mut self, _message: &str) {}

    /// Rendered scan output (a single error fragment when the service
    /// reported one).
    fn show_fragments(&mut self, _fragments: &[ResultFragment]) {}

    /// A tracking-simulation report.
    fn show_report(&mut self, _report: &serde_json::Value) {}
}

/// View that ignores every effect.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl SessionView for NullView {}
