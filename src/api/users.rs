use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use super::{Auth, ApiClient, Page, PageRequest};
use crate::domain::aggregates::{UserProfile, UserSummary};
use crate::domain::value_objects::Role;
use crate::forms::{LoginForm, PasswordChangeForm, RegisterForm};
use crate::Result;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenewedToken {
    access_token: String,
}

impl ApiClient {
    /// Exchanges credentials for a token pair and stores it.
    pub async fn login(&self, form: &LoginForm) -> Result<AuthTokens> {
        form.validate()?;
        let req = self.http.post(self.url(&["login", "local"])).json(form);
        let tokens: AuthTokens = self.send(req, Auth::Optional).await?;
        self.tokens.store_login(&tokens)?;
        Ok(tokens)
    }

    /// Swaps the stored refresh token for a fresh access token.
    pub async fn renew_token(&self) -> Result<()> {
        let refresh = self.tokens.refresh_token()?.ok_or(crate::StorefrontError::NotAuthenticated)?;
        let req = self.http.post(self.url(&["login", "renew-token"])).json(&json!({ "refreshToken": refresh }));
        let renewed: RenewedToken = self.send(req, Auth::Optional).await?;
        self.tokens.replace_access(&renewed.access_token)
    }

    /// Renews the access token when the session is alive but the token has expired.
    /// Returns whether a renewal happened.
    pub async fn refresh_if_expired(&self) -> Result<bool> {
        if !self.tokens.is_logged_in()? || self.tokens.access_token()?.is_some() {
            return Ok(false);
        }
        self.renew_token().await?;
        Ok(true)
    }

    pub async fn me(&self) -> Result<UserProfile> {
        let req = self.http.get(self.url(&["users", "find", "no-password", "me"]));
        self.send(req, Auth::Required).await
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<()> {
        form.validate()?;
        let body = json!({ "name": form.name, "surname": form.surname, "email": form.email, "password": form.password });
        let req = self.http.post(self.url(&["users", "register"])).json(&body);
        self.send_empty(req, Auth::Optional).await
    }

    /// Confirms a freshly registered account.
    pub async fn authorize_user(&self, user_id: &str) -> Result<()> {
        let req = self.http.get(self.url(&["users", "authorize-user", user_id]));
        self.send_empty(req, Auth::Optional).await
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let req = self.http.post(self.url(&["users", "change", "password-reset-request"])).json(&json!({ "email": email }));
        self.send_empty(req, Auth::Optional).await
    }

    /// Sets a new password, authenticating with the reset token when one is given.
    pub async fn change_password(&self, form: &PasswordChangeForm) -> Result<()> {
        form.validate()?;
        let mut req = self.http.patch(self.url(&["users", "change", "password"])).json(&json!({ "password": form.password }));
        if let Some(token) = &form.reset_token {
            req = req.bearer_auth(token);
            return crate::api::check_status(req.send().await?).await.map(|_| ());
        }
        self.send_empty(req, Auth::Required).await
    }

    pub async fn change_role(&self, user_id: &str, role: Role) -> Result<()> {
        let req = self.http.patch(self.url(&["users", "change", "role", user_id])).json(&json!({ "role": role }));
        self.send_empty(req, Auth::Required).await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        let req = self.http.delete(self.url(&["users", "delete", user_id]));
        self.send_empty(req, Auth::Required).await
    }

    pub async fn all_users(&self, page: PageRequest) -> Result<Page<UserSummary>> {
        let req = self.http.get(self.url(&["users", "find", "all"])).query(&page);
        self.send(req, Auth::Required).await
    }
}
