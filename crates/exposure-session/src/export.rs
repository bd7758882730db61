//! Export of the cached job to a JSON artifact.

use crate::error::Result;
use exposure_core::types::{JobRecord, Timestamp};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Serialize a job record to a pretty-printed JSON file in `dir`.
///
/// The filename is `osint_<query-or-token>_<ISO8601-seconds>.json`,
/// deterministic from the job's query (or the `simulation` token) and
/// the current second. The written bytes round-trip to the cached job
/// exactly.
pub fn export_job(job: &JobRecord, dir: &Path) -> Result<PathBuf> {
    let token = sanitize_token(job.export_token());
    let filename = format!(
        "osint_{token}_{}.json",
        Timestamp::now().to_iso8601_seconds()
    );
    let path = dir.join(filename);

    let contents = serde_json::to_string_pretty(job)?;
    fs::write(&path, contents)?;

    info!(path = %path.display(), "exported job artifact");
    Ok(path)
}

/// Make a query safe for use as a filename component. Anything outside
/// alphanumerics, `-`, `_`, and `.` is replaced with `-`.
fn sanitize_token(raw: &str) -> String {
    let token: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();

    if token.is_empty() {
        "scan".to_string()
    } else {
        token
    }
}
