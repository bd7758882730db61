//! Environment attribute probes.
//!
//! A probe reports each attribute as an `Option`; resolution with
//! fallbacks happens in the collector so that fingerprinting never
//! fails because an attribute is missing.

use exposure_core::EnvironmentConfig;
use serde::{Deserialize, Serialize};
use std::fs;

/// Source of ambient environment attributes.
///
/// Implemented by [`HostProbe`] for real sessions and by fixed-value
/// probes in tests, which pin the attribute tuple and assert an exact
/// digest.
pub trait EnvironmentProbe {
    /// Client user-agent string.
    fn user_agent(&self) -> Option<String>;
    /// Locale/language tag (e.g. `en-US`).
    fn language(&self) -> Option<String>;
    /// Screen width in pixels.
    fn screen_width(&self) -> Option<u32>;
    /// Screen height in pixels.
    fn screen_height(&self) -> Option<u32>;
    /// Device pixel ratio.
    fn pixel_ratio(&self) -> Option<f64>;
    /// Resolved IANA timezone name.
    fn timezone(&self) -> Option<String>;
}

/// Resolved attribute tuple with fallbacks applied.
///
/// This is what the seed is composed from and what the `collect`
/// payload reports as raw inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentAttributes {
    /// User-agent string (`Unknown` if unavailable)
    pub user_agent: String,
    /// Language tag (empty if unavailable)
    pub language: String,
    /// Screen width in pixels
    pub screen_width: u32,
    /// Screen height in pixels
    pub screen_height: u32,
    /// Device pixel ratio
    pub pixel_ratio: f64,
    /// IANA timezone name (`Unknown` if unresolvable)
    pub timezone: String,
}

/// Probe reading the host process environment.
///
/// Display metrics and the user-agent come from configuration; locale
/// and timezone are read from `LC_ALL`/`LANG`, `TZ`, and
/// `/etc/timezone`.
#[derive(Debug, Clone)]
pub struct HostProbe {
    environment: EnvironmentConfig,
}

impl HostProbe {
    /// Create a probe backed by the given environment settings.
    #[must_use]
    pub fn new(environment: EnvironmentConfig) -> Self {
        Self { environment }
    }

    /// Normalize a POSIX locale (`en_US.UTF-8`) to a language tag (`en-US`).
    fn normalize_locale(raw: &str) -> Option<String> {
        let tag = raw.split('.').next()?.trim().replace('_', "-");
        if tag.is_empty() || tag == "C" || tag == "POSIX" {
            None
        } else {
            Some(tag)
        }
    }
}

impl EnvironmentProbe for HostProbe {
    fn user_agent(&self) -> Option<String> {
        let ua = self.environment.user_agent.trim();
        if ua.is_empty() {
            None
        } else {
            Some(ua.to_string())
        }
    }

    fn language(&self) -> Option<String> {
        // POSIX precedence: LC_ALL overrides LANG.
        std::env::var("LC_ALL")
            .ok()
            .as_deref()
            .and_then(Self::normalize_locale)
            .or_else(|| {
                std::env::var("LANG")
                    .ok()
                    .as_deref()
                    .and_then(Self::normalize_locale)
            })
    }

    fn screen_width(&self) -> Option<u32> {
        Some(self.environment.screen_width)
    }

    fn screen_height(&self) -> Option<u32> {
        Some(self.environment.screen_height)
    }

    fn pixel_ratio(&self) -> Option<f64> {
        Some(self.environment.pixel_ratio)
    }

    fn timezone(&self) -> Option<String> {
        if let Ok(tz) = std::env::var("TZ") {
            let tz = tz.trim().to_string();
            if !tz.is_empty() {
                return Some(tz);
            }
        }

        fs::read_to_string("/etc/timezone")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_locale() {
        assert_eq!(
            HostProbe::normalize_locale("en_US.UTF-8"),
            Some("en-US".to_string())
        );
        assert_eq!(
            HostProbe::normalize_locale("de_DE"),
            Some("de-DE".to_string())
        );
        assert_eq!(HostProbe::normalize_locale("C"), None);
        assert_eq!(HostProbe::normalize_locale("POSIX"), None);
        assert_eq!(HostProbe::normalize_locale(""), None);
    }

    #[test]
    fn test_host_probe_uses_configured_metrics() {
        let probe = HostProbe::new(EnvironmentConfig {
            user_agent: "TestAgent/1.0".to_string(),
            screen_width: 1366,
            screen_height: 768,
            pixel_ratio: 2.0,
        });

        assert_eq!(probe.user_agent().as_deref(), Some("TestAgent/1.0"));
        assert_eq!(probe.screen_width(), Some(1366));
        assert_eq!(probe.screen_height(), Some(768));
        assert_eq!(probe.pixel_ratio(), Some(2.0));
    }

    #[test]
    fn test_lc_all_takes_precedence_over_lang() {
        std::env::set_var("LC_ALL", "de_DE.UTF-8");
        std::env::set_var("LANG", "en_US.UTF-8");

        let probe = HostProbe::new(EnvironmentConfig::default());
        assert_eq!(probe.language().as_deref(), Some("de-DE"));

        std::env::remove_var("LC_ALL");
        std::env::remove_var("LANG");
    }

    #[test]
    fn test_host_probe_blank_user_agent_is_missing() {
        let probe = HostProbe::new(EnvironmentConfig {
            user_agent: "   ".to_string(),
            ..EnvironmentConfig::default()
        });
        assert!(probe.user_agent().is_none());
    }
}
