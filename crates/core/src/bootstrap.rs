//! One-time bootstrap credential for first-run login.

use std::fmt;
use std::sync::Mutex;
use subtle::ConstantTimeEq;

/// A single process-lifetime key that authenticates at most once.
///
/// The slot is cleared on the first successful redemption; any mismatch
/// leaves it intact for retry.
pub struct BootstrapKey {
    slot: Mutex<Option<String>>,
}

impl BootstrapKey {
    /// Wrap an already-generated key value.
    pub fn new(value: String) -> Self {
        Self {
            slot: Mutex::new(Some(value)),
        }
    }

    /// Generate a fresh random bootstrap key, returning the value alongside
    /// so it can be surfaced once at startup.
    pub fn generate() -> (Self, String) {
        let value = crate::generate_key();
        (Self::new(value.clone()), value)
    }

    /// Redeem the key: clears the slot and returns true iff `candidate`
    /// matches the stored value. Comparison is constant-time.
    pub fn redeem(&self, candidate: &str) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let matches = slot
            .as_ref()
            .is_some_and(|value| bool::from(value.as_bytes().ct_eq(candidate.as_bytes())));
        if matches {
            *slot = None;
        }
        matches
    }

    /// Whether the key is still redeemable.
    pub fn is_armed(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }
}

impl fmt::Debug for BootstrapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BootstrapKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeems_exactly_once() {
        let (key, value) = BootstrapKey::generate();
        assert!(key.is_armed());
        assert!(key.redeem(&value));
        assert!(!key.is_armed());
        assert!(!key.redeem(&value));
    }

    #[test]
    fn mismatch_leaves_key_armed() {
        let (key, value) = BootstrapKey::generate();
        assert!(!key.redeem("wrong"));
        assert!(key.is_armed());
        assert!(key.redeem(&value));
    }

    #[test]
    fn empty_candidate_never_matches() {
        let (key, _value) = BootstrapKey::generate();
        assert!(!key.redeem(""));
        assert!(key.is_armed());
    }

    #[test]
    fn debug_redacts_value() {
        let (key, _value) = BootstrapKey::generate();
        assert_eq!(format!("{key:?}"), "BootstrapKey([REDACTED])");
    }
}
