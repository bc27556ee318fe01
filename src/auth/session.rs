//! Session hydration
//!
//! `Uninitialized → Loading → {Hydrated | Unauthenticated}`. Terminal states are
//! not left automatically; only [`Session::login`] and [`Session::logout`] move
//! the session again.

use tracing::{info, warn};

use crate::api::ApiClient;
use crate::domain::aggregates::UserProfile;
use crate::domain::events::{DomainEvent, SessionEvent};
use crate::forms::LoginForm;
use crate::storage::SessionStorage;
use crate::{Result, StorefrontError};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Loading,
    Hydrated(UserProfile),
    Unauthenticated,
}

impl SessionState {
    pub fn into_user(self) -> Option<UserProfile> {
        match self { SessionState::Hydrated(user) => Some(user), _ => None }
    }
}

pub struct Session {
    state: SessionState,
    cache: SessionStorage,
}

impl Session {
    pub fn new(cache: SessionStorage) -> Self { Self { state: SessionState::Uninitialized, cache } }

    pub fn state(&self) -> &SessionState { &self.state }

    pub fn user(&self) -> Option<&UserProfile> {
        match &self.state { SessionState::Hydrated(user) => Some(user), _ => None }
    }

    /// Cached display name, available without a backend round-trip.
    pub fn display_name(&self) -> Result<Option<(String, String)>> { self.cache.display_name() }

    /// Loads the profile once when a credential is stored. Fetch failures leave the session unauthenticated.
    pub async fn hydrate(&mut self, api: &ApiClient) -> &SessionState {
        if self.state != SessionState::Uninitialized {
            return &self.state;
        }
        match api.tokens().access_token() {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.state = SessionState::Unauthenticated;
                return &self.state;
            }
            Err(e) => {
                warn!(error = %e, "could not read credentials");
                self.state = SessionState::Unauthenticated;
                return &self.state;
            }
        }

        self.state = SessionState::Loading;
        self.state = match api.me().await {
            Ok(user) => {
                if let Err(e) = self.cache.set_display_name(&user.name, &user.surname) {
                    warn!(error = %e, "could not cache display name");
                }
                DomainEvent::Session(SessionEvent::Hydrated { user_id: user.id.clone() }).log();
                SessionState::Hydrated(user)
            }
            Err(e) => {
                warn!(error = %e, "session hydration failed");
                SessionState::Unauthenticated
            }
        };
        &self.state
    }

    pub async fn login(&mut self, api: &ApiClient, form: &LoginForm) -> Result<&UserProfile> {
        api.login(form).await?;
        DomainEvent::Session(SessionEvent::LoggedIn { email: form.email.clone() }).log();
        self.state = SessionState::Uninitialized;
        match self.hydrate(api).await {
            SessionState::Hydrated(user) => Ok(user),
            _ => Err(StorefrontError::NotAuthenticated),
        }
    }

    pub fn logout(&mut self, api: &ApiClient) -> Result<()> {
        self.state = SessionState::Unauthenticated;
        api.tokens().clear()?;
        self.cache.clear()?;
        DomainEvent::Session(SessionEvent::LoggedOut).log();
        info!("session cleared");
        Ok(())
    }
}
