//! Challenge signature verification.

use crate::key::AuthorizedKey;
use sha2::{Digest, Sha256};

/// Verify a signed challenge against a stored authorized-key entry.
///
/// The signature is expected over the SHA-256 digest of the challenge bytes.
/// Any parse or verification failure yields `false`; nothing panics and no
/// error escapes this boundary.
pub fn verify_challenge(stored_public_key: &str, challenge: &[u8], signature: &[u8]) -> bool {
    let key = match AuthorizedKey::parse(stored_public_key) {
        Ok(key) => key,
        Err(err) => {
            tracing::debug!(error = %err, "failed to parse stored public key");
            return false;
        }
    };
    let digest = Sha256::digest(challenge);
    key.verify(&digest, signature)
}
