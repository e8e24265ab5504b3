//! OpenSSH authorized-key parsing.

use crate::error::{KeyError, KeyResult};
use base64::Engine;
use ed25519_dalek::{Signature, VerifyingKey};

/// Algorithm identifier for Ed25519 keys.
const ALGORITHM_ED25519: &str = "ssh-ed25519";

/// A public key parsed from an OpenSSH authorized-key line.
pub struct AuthorizedKey {
    algorithm: String,
    comment: Option<String>,
    verifying_key: VerifyingKey,
}

impl AuthorizedKey {
    /// Parse an authorized-key line: `<algorithm> <base64-blob> [comment]`.
    ///
    /// The blob is SSH wire format and must declare the same algorithm as
    /// the leading field. Only `ssh-ed25519` keys are accepted.
    pub fn parse(line: &str) -> KeyResult<Self> {
        let mut fields = line.split_whitespace();
        let algorithm = fields
            .next()
            .ok_or_else(|| KeyError::Parsing("empty key line".to_string()))?;
        let blob_b64 = fields
            .next()
            .ok_or_else(|| KeyError::Parsing("missing key data".to_string()))?;
        let comment = fields.next().map(str::to_string);

        if algorithm != ALGORITHM_ED25519 {
            return Err(KeyError::UnsupportedAlgorithm(algorithm.to_string()));
        }

        let blob = base64::engine::general_purpose::STANDARD
            .decode(blob_b64)
            .map_err(|e| KeyError::Parsing(format!("invalid base64 key data: {e}")))?;

        let mut reader = WireReader::new(&blob);
        let wire_algorithm = reader.read_string()?;
        if wire_algorithm != algorithm.as_bytes() {
            return Err(KeyError::Parsing(
                "key blob algorithm does not match declared algorithm".to_string(),
            ));
        }
        let key_bytes: [u8; 32] = reader
            .read_string()?
            .try_into()
            .map_err(|_| KeyError::Parsing("ed25519 public key must be 32 bytes".to_string()))?;
        let verifying_key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| KeyError::Parsing(format!("invalid ed25519 public key: {e}")))?;

        Ok(Self {
            algorithm: algorithm.to_string(),
            comment,
            verifying_key,
        })
    }

    /// The declared key algorithm.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// The trailing comment, if any.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Verify a detached signature over `message`. Returns false on any
    /// malformed signature or verification failure.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        self.verifying_key.verify_strict(message, &signature).is_ok()
    }
}

impl std::fmt::Debug for AuthorizedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedKey")
            .field("algorithm", &self.algorithm)
            .field("comment", &self.comment)
            .finish_non_exhaustive()
    }
}

/// Encode a verifying key as an authorized-key line.
pub fn encode_authorized_key(key: &VerifyingKey, comment: Option<&str>) -> String {
    let mut blob = Vec::new();
    write_string(&mut blob, ALGORITHM_ED25519.as_bytes());
    write_string(&mut blob, key.as_bytes());
    let b64 = base64::engine::general_purpose::STANDARD.encode(&blob);
    match comment {
        Some(comment) => format!("{ALGORITHM_ED25519} {b64} {comment}"),
        None => format!("{ALGORITHM_ED25519} {b64}"),
    }
}

fn write_string(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
}

/// Minimal reader for SSH wire-format length-prefixed strings.
struct WireReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> WireReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn read_string(&mut self) -> KeyResult<&'a [u8]> {
        let truncated = || KeyError::Parsing("truncated key blob".to_string());

        let len_end = self.offset.checked_add(4).ok_or_else(truncated)?;
        let len_bytes = self.data.get(self.offset..len_end).ok_or_else(truncated)?;
        let len =
            u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;

        let end = len_end.checked_add(len).ok_or_else(truncated)?;
        let data = self.data.get(len_end..end).ok_or_else(truncated)?;
        self.offset = end;
        Ok(data)
    }
}
