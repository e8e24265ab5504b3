//! Core domain types and shared logic for the Warden control plane.
//!
//! This crate defines the pieces every other crate builds on:
//! - Configuration types for the server binary
//! - Session token issuance and verification
//! - The per-username authentication challenge broker
//! - The one-time bootstrap credential

pub mod bootstrap;
pub mod challenge;
pub mod config;
pub mod error;
pub mod session;

pub use bootstrap::BootstrapKey;
pub use challenge::ChallengeBroker;
pub use error::{Error, Result};
pub use session::{SessionClaims, SessionIssuer};

/// Size in bytes of generated key material (challenges, bootstrap key,
/// fallback server secret).
pub const KEY_MATERIAL_SIZE: usize = 32;

/// Generate fresh random key material, base64-encoded.
pub fn generate_key() -> String {
    use base64::Engine;
    use rand_core::RngCore;

    let mut bytes = [0u8; KEY_MATERIAL_SIZE];
    rand_core::OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_distinct() {
        assert_ne!(generate_key(), generate_key());
    }

    #[test]
    fn generated_keys_decode_to_expected_size() {
        use base64::Engine;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(generate_key())
            .unwrap();
        assert_eq!(decoded.len(), KEY_MATERIAL_SIZE);
    }
}
