//! Maria Pinina Storefront Client
//!
//! Client side of the Maria Pinina marketplace: every data operation is a call
//! to the backend REST API, while the cart lives locally.
//!
//! ## Features
//! - Product browsing and category navigation
//! - Login, registration and background token renewal
//! - Multi-seller cart with per-seller totals
//! - Checkout against the orders API
//! - Admin back-office over users, products, categories and orders

pub mod admin;
pub mod api;
pub mod auth;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod forms;
pub mod storage;
pub mod store;

use thiserror::Error;

pub use api::ApiClient;
pub use checkout::{Checkout, CheckoutReport, CheckoutStatus, ClearPolicy};
pub use domain::aggregates::{CartState, LineItem, ProductRef, SellerOrder};
pub use store::CartStore;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Invalid form: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Cart error: {0}")]
    Cart(#[from] domain::aggregates::CartError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for StorefrontError {
    fn from(e: std::io::Error) -> Self {
        Self::StorageError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = StorefrontError::Backend { status: 404, message: "Product not found".into() };
        assert_eq!(err.to_string(), "Backend returned 404: Product not found");
    }

    #[test]
    fn test_io_error_becomes_storage_error() {
        let err: StorefrontError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, StorefrontError::StorageError(msg) if msg == "denied"));
    }
}
