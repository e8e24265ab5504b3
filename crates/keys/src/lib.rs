//! SSH public-key handling for the Warden control plane.
//!
//! Parses OpenSSH authorized-key lines and verifies challenge signatures
//! against them. Only Ed25519 keys are supported; anything else is rejected
//! at parse time.

pub mod error;
pub mod key;
pub mod verifier;

pub use error::{KeyError, KeyResult};
pub use key::{AuthorizedKey, encode_authorized_key};
pub use verifier::verify_challenge;
