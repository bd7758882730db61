//! Result rendering.
//!
//! Converts a scan job response into display fragments. A response
//! carrying a service error renders as a single error fragment and
//! nothing else, even if the body also contained results.

use exposure_core::types::ScanJob;
use serde::Serialize;
use std::fmt;

/// A renderable block of scan output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResultFragment {
    /// Service-reported error; the sole output when present
    Error {
        /// The service's message
        message: String,
    },
    /// One labeled match block
    Match {
        /// Platform name
        platform: String,
        /// Kind of match
        match_type: String,
        /// Confidence rounded to the nearest whole percent
        confidence_percent: u8,
        /// Outbound link
        url: String,
        /// Optional content snippet
        snippet: Option<String>,
    },
}

impl fmt::Display for ResultFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error { message } => write!(f, "scan failed: {message}"),
            Self::Match {
                platform,
                match_type,
                confidence_percent,
                url,
                snippet,
            } => {
                writeln!(f, "{platform}")?;
                writeln!(f, "  {match_type} · confidence {confidence_percent}%")?;
                write!(f, "  {url}")?;
                if let Some(snippet) = snippet {
                    write!(f, "\n  {snippet}")?;
                }
                Ok(())
            }
        }
    }
}

/// Round a raw confidence value to a whole percent, clamped into
/// [0,100] even when the service sends junk (negative, >1, NaN).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn confidence_percent(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    (raw.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Render a scan job into display fragments.
#[must_use]
pub fn render(job: &ScanJob) -> Vec<ResultFragment> {
    if let Some(message) = &job.error {
        return vec![ResultFragment::Error {
            message: message.clone(),
        }];
    }

    job.results
        .iter()
        .map(|item| ResultFragment::Match {
            platform: item.platform.clone(),
            match_type: item.match_type.clone(),
            confidence_percent: confidence_percent(item.confidence),
            url: item.url.clone(),
            snippet: item.snippet.clone(),
        })
        .collect()
}
