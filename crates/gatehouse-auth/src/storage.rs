//! Durable key-value storage seam and the single-session store built on it.
//!
//! # Design
//! - Storage access is synchronous and local; one logical writer per page.
//! - The session store restores lazily on first access, once per lifetime.
//! - Corrupt records degrade to "logged out" and are deleted, never raised.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::AuthError;
use crate::model::Session;

/// Durable per-browser key-value storage.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure when the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    /// Remove `key`; missing keys are ignored.
    fn delete(&self, key: &str);
}

/// In-memory storage; clones share the same map, which lets tests model a reload.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Holds at most one session, mirrored to a single storage key.
pub struct SessionStore<S> {
    storage: S,
    key: String,
    current: RefCell<Option<Option<Session>>>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Store backed by `storage` under `key`. Nothing is read until first access.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            current: RefCell::new(None),
        }
    }

    /// Storage key holding the session record.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current session, restoring from storage on first call.
    pub fn current(&self) -> Option<Session> {
        if let Some(cached) = self.current.borrow().as_ref() {
            return cached.clone();
        }
        let restored = match self.restore() {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "discarding unreadable session record");
                self.storage.delete(&self.key);
                None
            }
        };
        *self.current.borrow_mut() = Some(restored.clone());
        restored
    }

    /// Replace the session in memory and storage.
    ///
    /// A failed storage write is logged; the in-memory session still applies.
    pub fn save(&self, session: Session) {
        match serde_json::to_string(&session) {
            Ok(json) => {
                if let Err(detail) = self.storage.set(&self.key, &json) {
                    tracing::warn!(key = %self.key, %detail, "session write failed");
                }
            }
            Err(err) => tracing::warn!(key = %self.key, error = %err, "session encode failed"),
        }
        *self.current.borrow_mut() = Some(Some(session));
    }

    /// Drop the session from memory and storage. Idempotent.
    pub fn clear(&self) {
        self.storage.delete(&self.key);
        *self.current.borrow_mut() = Some(None);
    }

    fn restore(&self) -> Result<Option<Session>, AuthError> {
        let Some(raw) = self.storage.get(&self.key) else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| AuthError::StorageCorrupt {
                detail: err.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;

    const KEY: &str = "test_session";

    fn sample() -> Session {
        Session {
            user: User {
                id: "mock-user-1".to_string(),
                email: "admin@test.com".to_string(),
                created_at: "2024-05-01T00:00:00Z".to_string(),
            },
            access_token: "mock-token-1".to_string(),
            expires_at: None,
        }
    }

    #[test]
    fn empty_storage_means_no_session() {
        let store = SessionStore::new(MemoryStore::new(), KEY);
        assert!(store.current().is_none());
    }

    #[test]
    fn saved_session_survives_reload() {
        let storage = MemoryStore::new();
        SessionStore::new(storage.clone(), KEY).save(sample());

        let reloaded = SessionStore::new(storage, KEY);
        assert_eq!(reloaded.current(), Some(sample()));
    }

    #[test]
    fn corrupt_record_is_cleared() {
        let storage = MemoryStore::new();
        storage.set(KEY, "{not json").unwrap();

        let store = SessionStore::new(storage.clone(), KEY);
        assert!(store.current().is_none());
        assert!(storage.get(KEY).is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let storage = MemoryStore::new();
        let store = SessionStore::new(storage.clone(), KEY);
        store.clear();
        store.save(sample());
        store.clear();
        store.clear();
        assert!(store.current().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn save_overwrites_previous_session() {
        let storage = MemoryStore::new();
        let store = SessionStore::new(storage.clone(), KEY);
        store.save(sample());
        let mut next = sample();
        next.access_token = "mock-token-2".to_string();
        store.save(next.clone());

        assert_eq!(storage.len(), 1);
        assert_eq!(SessionStore::new(storage, KEY).current(), Some(next));
    }
}
