use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::features::users::services::{DirectoryError, UserDirectory};
use crate::shared::constants::{MAX_USERNAME_SUGGESTIONS, USERNAME_LOOKUP_DEBOUNCE_MS};
use crate::shared::validation::USERNAME_REGEX;

struct SuggestState {
    input: String,
    suggestions: Vec<String>,
}

/// Debounced username suggestions for the reported-user field.
///
/// Correctness under out-of-order responses comes from staleness checking,
/// not request ordering: the query captured at dispatch time is compared
/// against the current field value when the result arrives, and mismatches
/// are discarded.
pub struct UsernameSuggester {
    directory: Arc<dyn UserDirectory>,
    state: Arc<Mutex<SuggestState>>,
}

impl UsernameSuggester {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            state: Arc::new(Mutex::new(SuggestState {
                input: String::new(),
                suggestions: Vec::new(),
            })),
        }
    }

    /// Record a keystroke. The caller follows up with `lookup` for the new
    /// value.
    pub fn set_input(&self, text: &str) {
        self.state.lock().expect("suggester lock poisoned").input = text.to_string();
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("suggester lock poisoned")
            .suggestions
            .clone()
    }

    /// Debounce, then query the directory and apply the result.
    pub async fn lookup(&self, query: String) {
        tokio::time::sleep(Duration::from_millis(USERNAME_LOOKUP_DEBOUNCE_MS)).await;

        // Input moved on during the debounce window: skip the request.
        if self.state.lock().expect("suggester lock poisoned").input != query {
            return;
        }

        // Input that cannot be a username prefix (empty, IP-shaped, leading
        // digit) never hits the directory.
        if !USERNAME_REGEX.is_match(&query) {
            self.apply_result(&query, Ok(Vec::new()));
            return;
        }

        let result = self
            .directory
            .search(&query, MAX_USERNAME_SUGGESTIONS)
            .await;
        self.apply_result(&query, result);
    }

    /// Apply a lookup result, discarding it when it no longer matches the
    /// current input. Failures are logged and clear the list.
    pub fn apply_result(&self, query: &str, result: Result<Vec<String>, DirectoryError>) {
        let mut state = self.state.lock().expect("suggester lock poisoned");
        if state.input != query {
            return;
        }
        match result {
            Ok(names) => state.suggestions = names,
            Err(e) => {
                tracing::warn!("username lookup failed: {}", e);
                state.suggestions.clear();
            }
        }
    }
}
