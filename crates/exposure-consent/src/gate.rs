//! Consent gate state machine.

use crate::{ConsentError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The exact confirmation phrase, compared case-insensitively after
/// trimming surrounding whitespace.
pub const CONSENT_PHRASE: &str = "I CONSENT";

/// Consent gate states. Transitions only move forward:
/// `AwaitingInput → Eligible → Granted`, with edits shuttling between
/// the first two until the grant is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentState {
    /// Default; the eligibility condition does not hold
    AwaitingInput,
    /// Phrase matches and the acknowledgment is checked; the enable
    /// control is actionable but consent is not yet recorded
    Eligible,
    /// Consent recorded; no path back within the session
    Granted,
}

/// Small state machine enforcing that scanning actions are unreachable
/// until consent is explicit.
///
/// Every phrase or acknowledgment edit re-evaluates eligibility
/// synchronously, so the enablement of the dependent control always
/// reflects the latest input.
#[derive(Debug, Clone)]
pub struct ConsentGate {
    phrase: String,
    acknowledged: bool,
    state: ConsentState,
}

impl ConsentGate {
    /// Create a gate in `AwaitingInput` with empty inputs.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phrase: String::new(),
            acknowledged: false,
            state: ConsentState::AwaitingInput,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ConsentState {
        self.state
    }

    /// Whether the eligibility condition currently holds.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        matches!(self.state, ConsentState::Eligible | ConsentState::Granted)
    }

    /// Whether consent has been recorded.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        self.state == ConsentState::Granted
    }

    /// Update the phrase field. No-op after the grant is recorded.
    pub fn set_phrase(&mut self, phrase: &str) {
        if self.state == ConsentState::Granted {
            return;
        }
        self.phrase = phrase.to_string();
        self.reevaluate();
    }

    /// Update the acknowledgment control. No-op after the grant is recorded.
    pub fn set_acknowledged(&mut self, acknowledged: bool) {
        if self.state == ConsentState::Granted {
            return;
        }
        self.acknowledged = acknowledged;
        self.reevaluate();
    }

    /// Record the grant. Only reachable from `Eligible`.
    ///
    /// # Errors
    /// `NotEligible` if the condition does not hold, `AlreadyGranted`
    /// on re-entry.
    pub fn grant(&mut self) -> Result<()> {
        match self.state {
            ConsentState::Granted => Err(ConsentError::AlreadyGranted),
            ConsentState::AwaitingInput => Err(ConsentError::NotEligible),
            ConsentState::Eligible => {
                info!("consent granted for this session");
                self.state = ConsentState::Granted;
                Ok(())
            }
        }
    }

    /// Pure eligibility predicate over raw inputs.
    #[must_use]
    pub fn evaluate(phrase: &str, acknowledged: bool) -> bool {
        phrase.trim().to_uppercase() == CONSENT_PHRASE && acknowledged
    }

    // Only called before the grant; the setters ignore later edits.
    fn reevaluate(&mut self) {
        let eligible = Self::evaluate(&self.phrase, self.acknowledged);
        let next = if eligible {
            ConsentState::Eligible
        } else {
            ConsentState::AwaitingInput
        };

        if next != self.state {
            debug!(from = ?self.state, to = ?next, "consent eligibility changed");
            self.state = next;
        }
    }
}

impl Default for ConsentGate {
    fn default() -> Self {
        Self::new()
    }
}
