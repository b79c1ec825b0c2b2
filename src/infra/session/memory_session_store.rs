use crate::domain::models::dialogue::{DialogueSession, SessionKey, Slot};
use crate::domain::ports::{SessionMutation, SessionStore};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::{DashMap, mapref::entry::Entry};
use tracing::debug;

/// Process-local session store.
///
/// Each key lives in one `DashMap` shard; `mutate` holds that shard's write lock for the
/// whole read-modify-write, so turns for the same key serialize. Expired sessions are
/// dropped lazily on access and in bulk by `purge_expired`.
pub struct InMemorySessionStore {
    sessions: DashMap<SessionKey, DialogueSession>,
    ttl: Option<Duration>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &SessionKey) -> Option<DialogueSession> {
        let now = Utc::now();
        match self.sessions.entry(key.clone()) {
            Entry::Occupied(entry) if entry.get().is_expired(now, self.ttl) => {
                debug!(session_key = %key, "Dropping expired dialogue session");
                entry.remove();
                None
            }
            Entry::Occupied(entry) => Some(entry.get().clone()),
            Entry::Vacant(_) => None,
        }
    }

    async fn create(&self, key: &SessionKey, initial: Slot) -> DialogueSession {
        let session = DialogueSession::new(initial, Utc::now());
        self.sessions.insert(key.clone(), session.clone());
        session
    }

    async fn mutate(&self, key: &SessionKey, f: SessionMutation<'_>) -> bool {
        let now = Utc::now();
        match self.sessions.entry(key.clone()) {
            Entry::Occupied(entry) if entry.get().is_expired(now, self.ttl) => {
                debug!(session_key = %key, "Dropping expired dialogue session");
                entry.remove();
                false
            }
            Entry::Occupied(mut entry) => {
                let session = entry.get_mut();
                f(session);
                session.touch(now);
                true
            }
            Entry::Vacant(_) => false,
        }
    }

    async fn delete(&self, key: &SessionKey) -> Option<DialogueSession> {
        self.sessions.remove(key).map(|(_, session)| session)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        if self.ttl.is_none() {
            return 0;
        }
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now, self.ttl));
        before.saturating_sub(self.sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn key(visitor: &str) -> SessionKey {
        SessionKey::new("bot-1", visitor)
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let store = InMemorySessionStore::new(None);
        assert!(store.get(&key("v1")).await.is_none());

        store.create(&key("v1"), Slot::Name).await;
        let changed = store.mutate(&key("v1"), Box::new(|s: &mut DialogueSession| {
            s.draft.name = Some("Jane Doe".into());
            s.slot = Slot::Phone;
        })).await;
        assert!(changed);

        let session = store.get(&key("v1")).await.unwrap();
        assert_eq!(session.slot, Slot::Phone);
        assert_eq!(session.draft.name.as_deref(), Some("Jane Doe"));

        assert!(store.delete(&key("v1")).await.is_some());
        assert!(store.delete(&key("v1")).await.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_mutate_without_session_is_noop() {
        let store = InMemorySessionStore::new(None);
        let changed = store.mutate(&key("ghost"), Box::new(|s: &mut DialogueSession| s.slot = Slot::Time)).await;
        assert!(!changed);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_lazy_and_swept_expiry() {
        let store = InMemorySessionStore::new(Some(Duration::minutes(30)));
        store.create(&key("stale"), Slot::Name).await;
        store.create(&key("fresh"), Slot::Name).await;

        let later = Utc::now() + Duration::minutes(31);
        assert_eq!(store.purge_expired(later).await, 2);
        assert!(store.is_empty());

        store.create(&key("fresh"), Slot::Name).await;
        assert_eq!(store.purge_expired(Utc::now()).await, 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_session_dropped_on_access() {
        let store = InMemorySessionStore::new(Some(Duration::minutes(30)));
        let idle_since = Utc::now() - Duration::minutes(31);
        store.sessions.insert(key("idle-get"), DialogueSession::new(Slot::Phone, idle_since));
        store.sessions.insert(key("idle-mutate"), DialogueSession::new(Slot::Phone, idle_since));
        store.create(&key("active"), Slot::Phone).await;

        assert!(store.get(&key("idle-get")).await.is_none());

        let mut touched = false;
        let changed = store.mutate(&key("idle-mutate"), Box::new(|_: &mut DialogueSession| touched = true)).await;
        assert!(!changed);
        assert!(!touched);

        assert_eq!(store.len(), 1);
        assert!(store.get(&key("active")).await.is_some());
    }

    #[tokio::test]
    async fn test_no_ttl_never_purges() {
        let store = InMemorySessionStore::new(None);
        store.create(&key("v1"), Slot::Email).await;
        assert_eq!(store.purge_expired(Utc::now() + Duration::days(365)).await, 0);
        assert!(store.get(&key("v1")).await.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_mutations_do_not_lose_updates() {
        let store = Arc::new(InMemorySessionStore::new(None));
        store.create(&key("busy"), Slot::Name).await;

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.mutate(&key("busy"), Box::new(|s: &mut DialogueSession| {
                    let n = s.draft.phone.as_deref().unwrap_or("").len();
                    s.draft.phone = Some("1".repeat(n + 1));
                })).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        let session = store.get(&key("busy")).await.unwrap();
        assert_eq!(session.draft.phone.unwrap().len(), 50);
    }
}
