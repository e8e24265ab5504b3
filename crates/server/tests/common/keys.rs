//! Test keypairs for the challenge-response flow.

use base64::Engine;
use ed25519_dalek::{Signer, SigningKey};
use sha2::{Digest, Sha256};

/// An Ed25519 keypair plus its authorized-key line.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestKeypair {
    signing_key: SigningKey,
    pub authorized_key: String,
}

#[allow(dead_code)]
impl TestKeypair {
    /// Generate a fresh keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand_core::OsRng);
        let authorized_key =
            warden_keys::encode_authorized_key(&signing_key.verifying_key(), Some("test@host"));
        Self {
            signing_key,
            authorized_key,
        }
    }

    /// Sign a base64-encoded challenge the way a client would: decode it,
    /// hash it, sign the digest, and base64-encode the signature.
    pub fn sign_challenge(&self, challenge_b64: &str) -> String {
        let engine = &base64::engine::general_purpose::STANDARD;
        let challenge = engine.decode(challenge_b64).expect("challenge is base64");
        let digest = Sha256::digest(&challenge);
        let signature = self.signing_key.sign(&digest);
        engine.encode(signature.to_bytes())
    }

    /// Like `sign_challenge`, but with one signature byte flipped.
    pub fn sign_challenge_tampered(&self, challenge_b64: &str) -> String {
        let engine = &base64::engine::general_purpose::STANDARD;
        let challenge = engine.decode(challenge_b64).expect("challenge is base64");
        let digest = Sha256::digest(&challenge);
        let mut signature = self.signing_key.sign(&digest).to_bytes();
        signature[0] ^= 0x01;
        engine.encode(signature)
    }
}
