use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

/// CSRF-token capability the intake pipeline delegates to.
pub trait CsrfValidator: Send + Sync {
    fn validate(&self, reporter_name: &str, token: &str) -> bool;
}

/// In-memory session token store.
///
/// Tokens are issued per reporter and compared on submission. Single-use is
/// not required; the token is invalidated when reissued.
#[derive(Default)]
pub struct SessionTokenStore {
    tokens: Mutex<HashMap<String, String>>,
}

impl SessionTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue (or reissue) a token for a reporter session.
    pub fn issue(&self, reporter_name: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens
            .lock()
            .expect("token store lock poisoned")
            .insert(reporter_name.to_string(), token.clone());
        token
    }
}

impl CsrfValidator for SessionTokenStore {
    fn validate(&self, reporter_name: &str, token: &str) -> bool {
        self.tokens
            .lock()
            .expect("token store lock poisoned")
            .get(reporter_name)
            .is_some_and(|expected| expected == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_validates_for_its_reporter_only() {
        let store = SessionTokenStore::new();
        let token = store.issue("Alice");

        assert!(store.validate("Alice", &token));
        assert!(!store.validate("Bob", &token));
        assert!(!store.validate("Alice", "wrong"));
    }

    #[test]
    fn reissuing_invalidates_the_previous_token() {
        let store = SessionTokenStore::new();
        let first = store.issue("Alice");
        let second = store.issue("Alice");

        assert!(!store.validate("Alice", &first));
        assert!(store.validate("Alice", &second));
    }
}
