//! Backend REST client
//!
//! Thin typed wrappers over the marketplace API. Every endpoint group lives in
//! its own module as an `impl ApiClient` block.

mod categories;
mod orders;
mod products;
mod users;

pub use products::PublicationUpdate;
pub use users::AuthTokens;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::TokenStore;
use crate::{Result, StorefrontError};

/// Paginated response shape shared by listing endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub limit: u32,
    pub offset: u32,
}

impl<T> Page<T> {
    /// A page shorter than its limit is the last one.
    pub fn is_last(&self) -> bool { (self.data.len() as u32) < self.limit || self.data.is_empty() }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

impl PageRequest {
    pub fn first(limit: u32) -> Self { Self { limit, offset: 0 } }
    pub fn next(&self) -> Self { Self { limit: self.limit, offset: self.offset + self.limit } }
}

impl Default for PageRequest {
    fn default() -> Self { Self::first(20) }
}

/// A file attached to a multipart form.
#[derive(Clone, Debug)]
pub struct Upload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    fn into_part(self) -> Result<reqwest::multipart::Part> {
        Ok(reqwest::multipart::Part::bytes(self.bytes).file_name(self.file_name).mime_str(&self.mime)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Auth {
    Required,
    Optional,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: TokenStore) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| StorefrontError::Config(format!("invalid API url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StorefrontError::Config(format!("API url {base_url} cannot carry a path")));
        }
        let http = Client::builder().user_agent(concat!("pinina-storefront/", env!("CARGO_PKG_VERSION"))).build()?;
        Ok(Self { base_url, http, tokens })
    }

    pub fn tokens(&self) -> &TokenStore { &self.tokens }
    pub fn base_url(&self) -> &Url { &self.base_url }

    /// Joins percent-encoded path segments onto the base URL.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn with_auth(&self, req: RequestBuilder, auth: Auth) -> Result<RequestBuilder> {
        match (self.tokens.access_token()?, auth) {
            (Some(token), _) => Ok(req.bearer_auth(token)),
            (None, Auth::Optional) => Ok(req),
            (None, Auth::Required) => Err(StorefrontError::NotAuthenticated),
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, auth: Auth) -> Result<T> {
        let response = self.with_auth(req, auth)?.send().await?;
        check_and_parse(response).await
    }

    async fn send_empty(&self, req: RequestBuilder, auth: Auth) -> Result<()> {
        let response = self.with_auth(req, auth)?.send().await?;
        check_status(response).await.map(|_| ())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: serde_json::Value,
}

/// Maps non-2xx responses to [`StorefrontError::Backend`], extracting the backend's `message` when present.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody { message: serde_json::Value::String(m) }) => m,
        Ok(ErrorBody { message }) => message.to_string(),
        Err(_) if text.is_empty() => status.canonical_reason().unwrap_or("request failed").to_string(),
        Err(_) => text,
    };
    tracing::debug!(status = status.as_u16(), %message, "backend rejected request");
    Err(StorefrontError::Backend { status: status.as_u16(), message })
}

async fn check_and_parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    Ok(check_status(response).await?.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CookieJar, MemoryStore};

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, TokenStore::new(CookieJar::new(MemoryStore::shared()))).unwrap()
    }

    #[test]
    fn test_url_joins_and_encodes_segments() {
        let api = client("http://shop.local/api/");
        let url = api.url(&["products", "get", "name", "mate cocido/2"]);
        assert_eq!(url.as_str(), "http://shop.local/api/products/get/name/mate%20cocido%2F2");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let tokens = TokenStore::new(CookieJar::new(MemoryStore::shared()));
        assert!(matches!(ApiClient::new("not a url", tokens.clone()), Err(StorefrontError::Config(_))));
        assert!(matches!(ApiClient::new("mailto:someone@x.io", tokens), Err(StorefrontError::Config(_))));
    }

    #[test]
    fn test_required_auth_without_token() {
        let api = client("http://shop.local");
        let req = api.http.get(api.url(&["users", "find", "no-password", "me"]));
        assert!(matches!(api.with_auth(req, Auth::Required), Err(StorefrontError::NotAuthenticated)));
    }

    #[test]
    fn test_page_is_last() {
        let page = Page { data: vec![1, 2], limit: 3, offset: 0 };
        assert!(page.is_last());
        let full = Page { data: vec![1, 2, 3], limit: 3, offset: 0 };
        assert!(!full.is_last());
        assert_eq!(PageRequest::first(3).next().offset, 3);
    }
}
