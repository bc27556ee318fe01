//! Durable client-side storage
//!
//! Everything the client persists (cart, cookies, session cache) goes through a
//! [`KeyValueStore`]. [`MemoryStore`] backs tests and the per-process session
//! cache; [`FileStore`] backs the CLI cart and cookies.

mod cookies;
mod file;

pub use cookies::{Cookie, CookieJar};
pub use file::FileStore;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Result, StorefrontError};

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Reads and decodes a JSON value. Absent keys yield `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
    pub fn shared() -> SharedStore { Arc::new(Self::new()) }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| StorefrontError::StorageError("memory store poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> { Ok(self.lock()?.get(key).cloned()) }
    fn set(&self, key: &str, value: &str) -> Result<()> { self.lock()?.insert(key.to_string(), value.to_string()); Ok(()) }
    fn remove(&self, key: &str) -> Result<()> { self.lock()?.remove(key); Ok(()) }
}

const NAME_KEY: &str = "session.name";
const SURNAME_KEY: &str = "session.surname";

/// Display name cache so views can greet the user without re-hydrating the session.
#[derive(Clone)]
pub struct SessionStorage {
    store: SharedStore,
}

impl SessionStorage {
    pub fn new(store: SharedStore) -> Self { Self { store } }

    pub fn set_display_name(&self, name: &str, surname: &str) -> Result<()> {
        self.store.set(NAME_KEY, name)?;
        self.store.set(SURNAME_KEY, surname)
    }

    pub fn display_name(&self) -> Result<Option<(String, String)>> {
        let name = self.store.get(NAME_KEY)?;
        let surname = self.store.get(SURNAME_KEY)?;
        Ok(name.map(|n| (n, surname.unwrap_or_default())))
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(NAME_KEY)?;
        self.store.remove(SURNAME_KEY)
    }
}
