//! Session token issuance and verification.

use crate::error::{Error, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::{Duration, OffsetDateTime};

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject the token was issued to.
    pub username: String,
    /// Absolute expiry, seconds since the Unix epoch.
    pub exp: u64,
}

/// Mints and verifies signed, expiring session tokens from a server secret.
///
/// Tokens are HS256 JWTs; verification rejects structural errors, signature
/// mismatches, tokens declaring any other algorithm, and elapsed expiry with
/// zero leeway.
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionIssuer {
    /// Create an issuer from the server-held symmetric secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `subject` expiring after `validity`.
    pub fn issue(&self, subject: &str, validity: Duration) -> Result<String> {
        let expires_at = OffsetDateTime::now_utc() + validity;
        let claims = SessionClaims {
            username: subject.to_string(),
            exp: expires_at.unix_timestamp().max(0) as u64,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::InvalidToken(format!("failed to sign token: {e}")))
    }

    /// Verify a token and return its subject claim.
    pub fn verify(&self, token: &str) -> Result<String> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Error::TokenExpired,
                _ => Error::InvalidToken(e.to_string()),
            },
        )?;
        Ok(data.claims.username)
    }
}

impl fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionIssuer([REDACTED])")
    }
}
