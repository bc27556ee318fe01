//! Bearer credentials kept in the cookie jar

use chrono::Duration;

use crate::api::AuthTokens;
use crate::storage::CookieJar;
use crate::{Result, StorefrontError};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";
pub const LOGGED_IN_COOKIE: &str = "isLoggedIn";

pub fn access_token_ttl() -> Duration { Duration::minutes(15) }
pub fn refresh_token_ttl() -> Duration { Duration::days(7) }

#[derive(Clone)]
pub struct TokenStore {
    jar: CookieJar,
}

impl TokenStore {
    pub fn new(jar: CookieJar) -> Self { Self { jar } }

    pub fn store_login(&self, tokens: &AuthTokens) -> Result<()> {
        self.jar.set(ACCESS_TOKEN_COOKIE, &tokens.access_token, access_token_ttl())?;
        self.jar.set(REFRESH_TOKEN_COOKIE, &tokens.refresh_token, refresh_token_ttl())?;
        self.jar.set(LOGGED_IN_COOKIE, "true", refresh_token_ttl())
    }

    pub fn access_token(&self) -> Result<Option<String>> { self.jar.get(ACCESS_TOKEN_COOKIE) }
    pub fn refresh_token(&self) -> Result<Option<String>> { self.jar.get(REFRESH_TOKEN_COOKIE) }
    pub fn is_logged_in(&self) -> Result<bool> { Ok(self.jar.get(LOGGED_IN_COOKIE)?.is_some()) }

    /// Overwrites the access token with a renewed one, restarting its expiry.
    /// Refused once the session has been cleared, so a late renewal cannot log the user back in.
    pub fn replace_access(&self, access_token: &str) -> Result<()> {
        if !self.is_logged_in()? { return Err(StorefrontError::NotAuthenticated); }
        self.jar.set(ACCESS_TOKEN_COOKIE, access_token, access_token_ttl())
    }

    /// Forgets every credential, the refresh token included.
    pub fn clear(&self) -> Result<()> {
        self.jar.remove(ACCESS_TOKEN_COOKIE)?;
        self.jar.remove(LOGGED_IN_COOKIE)?;
        self.jar.remove(REFRESH_TOKEN_COOKIE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::Utc;

    fn tokens() -> AuthTokens { AuthTokens { access_token: "acc".into(), refresh_token: "ref".into() } }

    #[test]
    fn test_login_then_clear() {
        let store = TokenStore::new(CookieJar::new(MemoryStore::shared()));
        assert!(!store.is_logged_in().unwrap());
        store.store_login(&tokens()).unwrap();
        assert!(store.is_logged_in().unwrap());
        assert_eq!(store.access_token().unwrap().as_deref(), Some("acc"));
        store.replace_access("acc2").unwrap();
        assert_eq!(store.access_token().unwrap().as_deref(), Some("acc2"));
        store.clear().unwrap();
        assert!(!store.is_logged_in().unwrap());
        assert_eq!(store.refresh_token().unwrap(), None);
    }

    #[test]
    fn test_replace_access_after_clear_is_refused() {
        let store = TokenStore::new(CookieJar::new(MemoryStore::shared()));
        store.store_login(&tokens()).unwrap();
        store.clear().unwrap();
        assert!(matches!(store.replace_access("late"), Err(StorefrontError::NotAuthenticated)));
        assert_eq!(store.access_token().unwrap(), None);
    }

    #[test]
    fn test_cookie_lifetimes() {
        let jar = CookieJar::new(MemoryStore::shared());
        let store = TokenStore::new(jar.clone());
        let before = Utc::now();
        store.store_login(&tokens()).unwrap();
        let after = Utc::now();

        let access = jar.cookie(ACCESS_TOKEN_COOKIE).unwrap().unwrap().expires_at;
        assert!(access >= before + Duration::minutes(15) && access <= after + Duration::minutes(15));
        for name in [REFRESH_TOKEN_COOKIE, LOGGED_IN_COOKIE] {
            let expires = jar.cookie(name).unwrap().unwrap().expires_at;
            assert!(expires >= before + Duration::days(7) && expires <= after + Duration::days(7));
        }
    }
}
