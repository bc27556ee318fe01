//! Client configuration

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;

use crate::api::ApiClient;
use crate::auth::TokenStore;
use crate::checkout::ClearPolicy;
use crate::domain::value_objects::PaymentMethod;
use crate::storage::{CookieJar, FileStore, SharedStore};
use crate::Result;

/// Settings shared by every command. Each flag can also come from the environment or a `.env` file.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Backend base URL
    #[arg(long, env = "PININA_API_URL", default_value = "http://localhost:3000")]
    pub api_url: String,

    /// Directory holding the cart, cookies and session cache
    #[arg(long, env = "PININA_DATA_DIR", default_value = ".pinina")]
    pub data_dir: PathBuf,

    /// Seconds between access token renewals
    #[arg(long, env = "PININA_RENEW_INTERVAL_SECS", default_value_t = 300)]
    pub renew_interval_secs: u64,

    /// Which seller orders to drop from the cart after a checkout with failures
    #[arg(long, env = "PININA_CHECKOUT_CLEAR", value_enum, default_value_t = ClearPolicy::SucceededOnly)]
    pub checkout_clear: ClearPolicy,

    /// Payment method sent with every order
    #[arg(long, env = "PININA_PAYMENT_METHOD", value_enum, default_value_t = PaymentMethod::Card)]
    pub payment_method: PaymentMethod,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Settings {
    pub fn renew_interval(&self) -> Duration { Duration::from_secs(self.renew_interval_secs.max(1)) }

    pub fn open_storage(&self) -> Result<SharedStore> { Ok(Arc::new(FileStore::open(&self.data_dir)?)) }

    pub fn api_client(&self, storage: SharedStore) -> Result<ApiClient> {
        ApiClient::new(&self.api_url, TokenStore::new(CookieJar::new(storage)))
    }
}
