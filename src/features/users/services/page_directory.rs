use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::features::users::models::PageTarget;

/// Revision-resolution capability.
///
/// Titles are parsed, not resolved: a report against a page with no
/// revisions yet only needs the title to be well-formed. Revisions must
/// exist.
#[async_trait]
pub trait PageDirectory: Send + Sync {
    async fn resolve_revision(&self, revision_id: u64) -> Option<PageTarget>;
}

/// In-memory revision index used by the binary and by tests.
#[derive(Default)]
pub struct InMemoryPageDirectory {
    revisions: RwLock<HashMap<u64, String>>,
}

impl InMemoryPageDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_revision(&self, revision_id: u64, title: &str) {
        self.revisions
            .write()
            .expect("page directory lock poisoned")
            .insert(revision_id, title.to_string());
    }
}

#[async_trait]
impl PageDirectory for InMemoryPageDirectory {
    async fn resolve_revision(&self, revision_id: u64) -> Option<PageTarget> {
        self.revisions
            .read()
            .expect("page directory lock poisoned")
            .get(&revision_id)
            .map(|title| PageTarget {
                title: title.clone(),
                revision_id: Some(revision_id),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_known_revisions_only() {
        let dir = InMemoryPageDirectory::new();
        dir.insert_revision(42, "Weather");

        let target = dir.resolve_revision(42).await.unwrap();
        assert_eq!(target.title, "Weather");
        assert_eq!(target.revision_id, Some(42));

        assert!(dir.resolve_revision(7).await.is_none());
    }
}
