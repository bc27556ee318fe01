//! Order payloads and records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::aggregates::cart::SellerOrder;
use crate::domain::value_objects::{Money, PaymentMethod};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine { pub product_id: String, pub quantity: u32 }

/// Body of `POST /orders/create`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub payment_method: PaymentMethod,
    pub products: Vec<OrderLine>,
}

impl OrderRequest {
    /// Flattens a seller order into `{productId, quantity}` pairs.
    pub fn from_seller_order(order: &SellerOrder, payment_method: PaymentMethod) -> Self {
        let products = order.items().iter()
            .map(|i| OrderLine { product_id: i.product.id.clone(), quantity: i.quantity.value() })
            .collect();
        Self { payment_method, products }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub total: Option<Money>,
    #[serde(default)]
    pub products: Vec<OrderLine>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
