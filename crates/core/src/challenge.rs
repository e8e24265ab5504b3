//! Per-username authentication challenges.

use base64::Engine;
use rand_core::RngCore;
use std::collections::HashMap;
use std::sync::Mutex;

/// Holds at most one outstanding challenge per username.
///
/// Issuing a new challenge for a username replaces any unconsumed one. Two
/// concurrent issues for the same username race and the later write wins;
/// clients are responsible for not interleaving logins for one username.
#[derive(Debug, Default)]
pub struct ChallengeBroker {
    slots: Mutex<HashMap<String, String>>,
}

impl ChallengeBroker {
    /// Create an empty broker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate and store a fresh challenge for `username`, returning it.
    ///
    /// Username existence is deliberately not checked here, so the response
    /// does not reveal which usernames are registered.
    pub fn issue(&self, username: &str) -> String {
        let mut nonce = [0u8; crate::KEY_MATERIAL_SIZE];
        rand_core::OsRng.fill_bytes(&mut nonce);
        let challenge = base64::engine::general_purpose::STANDARD.encode(nonce);

        let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.insert(username.to_string(), challenge.clone());
        challenge
    }

    /// Atomically remove and return the stored challenge for `username`.
    ///
    /// The lock is held across the read-and-remove, so a challenge can be
    /// consumed at most once no matter how many calls race.
    pub fn take(&self, username: &str) -> Option<String> {
        let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.remove(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn take_without_issue_is_none() {
        let broker = ChallengeBroker::new();
        assert!(broker.take("alice").is_none());
    }

    #[test]
    fn issue_then_take_returns_challenge_once() {
        let broker = ChallengeBroker::new();
        let challenge = broker.issue("alice");
        assert_eq!(broker.take("alice").as_deref(), Some(challenge.as_str()));
        assert!(broker.take("alice").is_none());
    }

    #[test]
    fn reissue_replaces_prior_challenge() {
        let broker = ChallengeBroker::new();
        let first = broker.issue("alice");
        let second = broker.issue("alice");
        assert_ne!(first, second);
        assert_eq!(broker.take("alice").as_deref(), Some(second.as_str()));
        assert!(broker.take("alice").is_none());
    }

    #[test]
    fn usernames_are_independent() {
        let broker = ChallengeBroker::new();
        broker.issue("alice");
        broker.issue("bob");
        assert!(broker.take("alice").is_some());
        assert!(broker.take("bob").is_some());
    }

    #[test]
    fn concurrent_takes_consume_at_most_once() {
        let broker = Arc::new(ChallengeBroker::new());
        broker.issue("alice");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let broker = broker.clone();
                std::thread::spawn(move || broker.take("alice").is_some())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(winners, 1);
    }
}
