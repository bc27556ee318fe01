use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{load_json, save_json, SharedStore};
use crate::Result;

const COOKIES_KEY: &str = "cookies";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl Cookie {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool { self.expires_at <= now }
}

/// Named values with absolute expiries. Expired cookies read as absent.
#[derive(Clone)]
pub struct CookieJar {
    store: SharedStore,
}

impl CookieJar {
    pub fn new(store: SharedStore) -> Self { Self { store } }

    fn load(&self) -> Result<HashMap<String, Cookie>> {
        Ok(load_json(self.store.as_ref(), COOKIES_KEY)?.unwrap_or_default())
    }

    fn save(&self, cookies: &HashMap<String, Cookie>) -> Result<()> {
        save_json(self.store.as_ref(), COOKIES_KEY, cookies)
    }

    pub fn set(&self, name: &str, value: &str, ttl: Duration) -> Result<()> {
        self.set_until(name, value, Utc::now() + ttl)
    }

    pub fn set_until(&self, name: &str, value: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let mut cookies = self.load()?;
        cookies.insert(name.to_string(), Cookie { value: value.to_string(), expires_at });
        self.save(&cookies)
    }

    pub fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.cookie(name)?.map(|c| c.value))
    }

    /// The live cookie with its expiry, if any.
    pub fn cookie(&self, name: &str) -> Result<Option<Cookie>> {
        let now = Utc::now();
        Ok(self.load()?.remove(name).filter(|c| !c.is_expired(now)))
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let mut cookies = self.load()?;
        if cookies.remove(name).is_some() { self.save(&cookies)?; }
        Ok(())
    }

    /// Drops every expired cookie from storage.
    pub fn purge_expired(&self) -> Result<usize> {
        let now = Utc::now();
        let mut cookies = self.load()?;
        let before = cookies.len();
        cookies.retain(|_, c| !c.is_expired(now));
        let purged = before - cookies.len();
        if purged > 0 { self.save(&cookies)?; }
        Ok(purged)
    }
}
