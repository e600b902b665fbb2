use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use crate::features::auth::ReporterAccount;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user lookup failed: {0}")]
    LookupFailed(String),
}

/// User-lookup capability.
///
/// Backs both the intake pipeline's reported-user resolution and the
/// dialog's prefix-search suggestions.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch an account by name, case-sensitively on the canonical form.
    async fn fetch(&self, name: &str) -> Result<Option<ReporterAccount>, DirectoryError>;

    /// Prefix search over usernames, bounded by `limit`.
    async fn search(&self, prefix: &str, limit: usize) -> Result<Vec<String>, DirectoryError>;
}

/// In-memory directory used by the binary and by tests.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    accounts: RwLock<HashMap<String, ReporterAccount>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, account: ReporterAccount) {
        self.accounts
            .write()
            .expect("user directory lock poisoned")
            .insert(account.name.clone(), account);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn fetch(&self, name: &str) -> Result<Option<ReporterAccount>, DirectoryError> {
        Ok(self
            .accounts
            .read()
            .expect("user directory lock poisoned")
            .get(name)
            .cloned())
    }

    async fn search(&self, prefix: &str, limit: usize) -> Result<Vec<String>, DirectoryError> {
        let accounts = self.accounts.read().expect("user directory lock poisoned");
        let mut names: Vec<String> = accounts
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect();
        names.sort();
        names.truncate(limit);
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::account;

    #[tokio::test]
    async fn search_is_prefix_bounded_and_sorted() {
        let dir = InMemoryUserDirectory::new();
        dir.insert(account("Anna"));
        dir.insert(account("Annabel"));
        dir.insert(account("Bob"));

        let hits = dir.search("Ann", 10).await.unwrap();
        assert_eq!(hits, vec!["Anna".to_string(), "Annabel".to_string()]);

        let bounded = dir.search("Ann", 1).await.unwrap();
        assert_eq!(bounded.len(), 1);
    }

    #[tokio::test]
    async fn fetch_returns_none_for_unknown_names() {
        let dir = InMemoryUserDirectory::new();
        dir.insert(account("Anna"));

        assert!(dir.fetch("Anna").await.unwrap().is_some());
        assert!(dir.fetch("Nobody").await.unwrap().is_none());
    }
}
