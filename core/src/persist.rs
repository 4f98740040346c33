//! Durable token/user persistence.
//!
//! ARCHITECTURE
//! ============
//! `KeyValueStore` abstracts the durable medium (browser `localStorage`, a
//! JSON file for the CLI, memory for tests). `Persistence` owns the key
//! layout: the token under `token` (older builds wrote `session_token`, which
//! is still read and always cleared) and the serialized user under `user`.
//! The session store is the only writer.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::StorageError;
use crate::types::UserRecord;

pub const TOKEN_KEY: &str = "token";
pub const LEGACY_TOKEN_KEY: &str = "session_token";
pub const USER_KEY: &str = "user";

/// String key/value storage with `localStorage` semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error if the value could not be written durably.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str);
}

/// In-process store used by tests and as a fallback when no durable medium exists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed entries, e.g. a token persisted by an earlier run.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { entries: Mutex::new(entries) }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
    }
}

/// A token restored from storage, with the user cached next to it if readable.
#[derive(Clone, Debug, PartialEq)]
pub struct PersistedSession {
    pub token: String,
    pub user: Option<UserRecord>,
}

/// Session key layout over a [`KeyValueStore`].
#[derive(Debug)]
pub struct Persistence<K> {
    store: K,
}

impl<K: KeyValueStore> Persistence<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// Underlying store, for inspection.
    pub fn store(&self) -> &K {
        &self.store
    }

    /// Read the persisted token and cached user. A corrupt user entry is
    /// dropped rather than failing the load; the token is what matters.
    pub fn load(&self) -> Option<PersistedSession> {
        let token = self
            .store
            .get(TOKEN_KEY)
            .or_else(|| self.store.get(LEGACY_TOKEN_KEY))
            .filter(|token| !token.trim().is_empty())?;
        let user = self.store.get(USER_KEY).and_then(|raw| match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("discarding unreadable cached user: {e}");
                None
            }
        });
        Some(PersistedSession { token, user })
    }

    /// Write token and user as a pair. If either write fails, both keys are
    /// removed so a half-written session is never restored.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be serialized or the store rejects a write.
    pub fn save(&self, token: &str, user: &UserRecord) -> Result<(), StorageError> {
        let raw_user = serde_json::to_string(user)?;
        let result = self
            .store
            .set(TOKEN_KEY, token)
            .and_then(|()| self.store.set(USER_KEY, &raw_user));
        if result.is_err() {
            self.clear();
        } else {
            self.store.remove(LEGACY_TOKEN_KEY);
        }
        result
    }

    /// Remove every session key.
    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(LEGACY_TOKEN_KEY);
        self.store.remove(USER_KEY);
    }
}
