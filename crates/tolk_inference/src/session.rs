use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tolk_core::Session;
use uuid::Uuid;

/// Process-wide session map. Each session sits behind its own lock, so two
/// concurrent rounds against the same id serialize instead of interleaving
/// history mutation. Sessions live until completed or process exit; there
/// is no TTL.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Arc<Mutex<Session>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A short random token for server-generated session ids.
    pub fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()[..8].to_string()
    }

    pub async fn insert(&self, session: Session) {
        self.inner
            .write()
            .await
            .insert(session.id.clone(), Arc::new(Mutex::new(session)));
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        self.inner.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &str) {
        self.inner.write().await.remove(id);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tolk_core::TranslationConfig;

    fn session(id: &str) -> Session {
        Session {
            id: id.to_string(),
            articles: vec![],
            history: vec![],
            config: TranslationConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = SessionStore::new();
        store.insert(session("abc123")).await;
        assert_eq!(store.len().await, 1);

        let handle = store.get("abc123").await.expect("session should exist");
        assert_eq!(handle.lock().await.id, "abc123");

        store.remove("abc123").await;
        assert!(store.get("abc123").await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let store = SessionStore::new();
        assert!(store.get("missing").await.is_none());
    }

    #[test]
    fn test_generated_ids_are_short_and_distinct() {
        let a = SessionStore::generate_id();
        let b = SessionStore::generate_id();
        assert_eq!(a.len(), 8);
        assert_ne!(a, b);
    }
}
