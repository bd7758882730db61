//! SHA-256 hex digest helper.
//!
//! The fingerprint digest and owner token are both derived through this
//! single function, so there is exactly one hashing rule in the system.

use crate::types::HexDigest;
use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 digest of a string's UTF-8 bytes.
///
/// Deterministic and pure: the same input always yields the same digest.
#[must_use]
pub fn sha256_hex(input: &str) -> HexDigest {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    HexDigest::from_hasher(hex)
}
