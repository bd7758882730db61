//! Fingerprint collection and seed composition.

use crate::probe::{EnvironmentAttributes, EnvironmentProbe};
use exposure_core::sha256_hex;
use exposure_core::types::{CollectPayload, HexDigest, ScreenMetrics, Timestamp};
use serde::Serialize;

/// Separator between seed fields.
///
/// The seed recipe — field order, this separator, and the `WxH` metric
/// format — is part of the service contract. Changing any of it changes
/// every fingerprint ever derived and is a breaking change.
pub const SEED_SEPARATOR: &str = "|";

/// A derived fingerprint, immutable once computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fingerprint {
    /// SHA-256 digest of the seed; doubles as the session owner token
    pub digest: HexDigest,
    /// Canonical seed the digest was derived from
    pub seed: String,
    /// Raw attributes that composed the seed
    pub attributes: EnvironmentAttributes,
    /// When the fingerprint was captured
    pub captured_at: Timestamp,
}

impl Fingerprint {
    /// Build the payload the `collect` endpoint expects: the derived
    /// digest plus its raw inputs.
    #[must_use]
    pub fn to_collect_payload(&self) -> CollectPayload {
        CollectPayload {
            fingerprint: self.digest.clone(),
            fingerprint_seed: self.seed.clone(),
            user_agent: self.attributes.user_agent.clone(),
            language: self.attributes.language.clone(),
            screen: ScreenMetrics {
                width: self.attributes.screen_width,
                height: self.attributes.screen_height,
                pr: self.attributes.pixel_ratio,
            },
            timezone: self.attributes.timezone.clone(),
        }
    }
}

/// Collects environment attributes and derives the fingerprint.
#[derive(Debug, Clone)]
pub struct FingerprintCollector<P: EnvironmentProbe> {
    probe: P,
}

impl<P: EnvironmentProbe> FingerprintCollector<P> {
    /// Create a collector over the given probe.
    #[must_use]
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Read the current attribute tuple, compose the canonical seed,
    /// and derive the fingerprint.
    ///
    /// Never fails: missing attributes get defined fallbacks. Idempotent
    /// within a session modulo attributes that legitimately change.
    pub fn collect(&self) -> Fingerprint {
        let attributes = self.resolve_attributes();
        let seed = Self::compose_seed(&attributes);
        let digest = sha256_hex(&seed);

        tracing::debug!(
            digest = %digest,
            timezone = %attributes.timezone,
            "fingerprint captured"
        );

        Fingerprint {
            digest,
            seed,
            attributes,
            captured_at: Timestamp::now(),
        }
    }

    /// Resolve attributes with fallbacks: `Unknown` for user-agent and
    /// timezone, empty string for language, zeroed metrics with unit
    /// pixel ratio.
    fn resolve_attributes(&self) -> EnvironmentAttributes {
        EnvironmentAttributes {
            user_agent: self
                .probe
                .user_agent()
                .unwrap_or_else(|| "Unknown".to_string()),
            language: self.probe.language().unwrap_or_default(),
            screen_width: self.probe.screen_width().unwrap_or(0),
            screen_height: self.probe.screen_height().unwrap_or(0),
            pixel_ratio: self.probe.pixel_ratio().unwrap_or(1.0),
            timezone: self
                .probe
                .timezone()
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }

    /// Compose the canonical seed: `ua|WxH|language|timezone`.
    ///
    /// Pixel ratio is reported in the collect payload but excluded from
    /// the seed, matching the original derivation recipe.
    fn compose_seed(attributes: &EnvironmentAttributes) -> String {
        [
            attributes.user_agent.clone(),
            format!("{}x{}", attributes.screen_width, attributes.screen_height),
            attributes.language.clone(),
            attributes.timezone.clone(),
        ]
        .join(SEED_SEPARATOR)
    }
}
