//! Catalog records as served by the backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::aggregates::cart::ProductRef;
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub category: Option<Category>,
    pub user: Seller,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller { pub id: String, pub name: String, #[serde(default)] pub surname: String }

impl Seller {
    pub fn display_name(&self) -> String {
        if self.surname.is_empty() { self.name.clone() } else { format!("{} {}", self.name, self.surname) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)] pub struct Photo { pub id: String, pub url: String }

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category { pub id: String, pub name: String, #[serde(default)] pub image: Option<String> }

impl Product {
    pub fn is_available(&self) -> bool { !self.paused && self.stock > 0 }

    /// Captures the fields the cart keeps for this product.
    pub fn snapshot(&self) -> ProductRef {
        ProductRef {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            seller_id: self.user.id.clone(),
            seller_name: self.user.display_name(),
            image: self.photos.first().map(|p| p.url.clone()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder { Asc, Desc }

/// Query string shared by the product listing endpoints.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub limit: u32,
    pub offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<SortOrder>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self { limit: 20, offset: 0, min_price: None, max_price: None, price_order: None, name_order: None, created_at: None }
    }
}

impl ProductQuery {
    pub fn page(limit: u32, offset: u32) -> Self { Self { limit, offset, ..Self::default() } }
    pub fn next_page(&self) -> Self { Self { offset: self.offset + self.limit, ..self.clone() } }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "p1", "name": "Mate", "price": 1500, "stock": 3,
            "photos": [{"id": "ph1", "url": "https://cdn/mate.png"}],
            "user": {"id": "u9", "name": "Maria", "surname": "Pinina"}
        })).unwrap()
    }

    #[test]
    fn test_snapshot_captures_seller() {
        let snap = sample().snapshot();
        assert_eq!(snap.seller_id, "u9");
        assert_eq!(snap.seller_name, "Maria Pinina");
        assert_eq!(snap.price.amount(), Decimal::new(1500, 0));
        assert_eq!(snap.image.as_deref(), Some("https://cdn/mate.png"));
    }

    #[test]
    fn test_availability() {
        let mut p = sample();
        assert!(p.is_available());
        p.paused = true;
        assert!(!p.is_available());
    }

    #[test]
    fn test_query_skips_unset_filters() {
        let q = ProductQuery { price_order: Some(SortOrder::Desc), ..ProductQuery::page(10, 20) };
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v, serde_json::json!({"limit": 10, "offset": 20, "priceOrder": "DESC"}));
        assert_eq!(q.next_page().offset, 30);
    }
}
