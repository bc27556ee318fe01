//! Cart Aggregate
//!
//! The cart is a list of per-seller orders. Each seller order owns its line items and keeps
//! `total == Σ price * quantity` after every mutation; a seller order never stays in the cart
//! once its last item is gone.

use serde::{Deserialize, Serialize};
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::{Money, Quantity, QuantityError};

/// Snapshot of a product taken when it was put in the cart. Never re-synced with the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub seller_id: String,
    pub seller_name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: ProductRef,
    pub quantity: Quantity,
}

impl LineItem {
    pub fn line_total(&self) -> Money { self.product.price.multiply(self.quantity.value()) }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerOrder {
    seller_id: String,
    seller_name: String,
    items: Vec<LineItem>,
    total: Money,
}

impl SellerOrder {
    fn new(seller_id: impl Into<String>, seller_name: impl Into<String>) -> Self {
        Self { seller_id: seller_id.into(), seller_name: seller_name.into(), items: vec![], total: Money::ZERO }
    }

    pub fn seller_id(&self) -> &str { &self.seller_id }
    pub fn seller_name(&self) -> &str { &self.seller_name }
    pub fn items(&self) -> &[LineItem] { &self.items }
    pub fn total(&self) -> Money { self.total }
    pub fn item(&self, product_id: &str) -> Option<&LineItem> { self.items.iter().find(|i| i.product.id == product_id) }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    fn recalculate(&mut self) { self.total = self.items.iter().map(LineItem::line_total).sum(); }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    orders: Vec<SellerOrder>,
    #[serde(default)]
    loading: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

/// Result of an absolute quantity update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
}

impl CartState {
    pub fn new() -> Self { Self::default() }

    pub fn orders(&self) -> &[SellerOrder] { &self.orders }
    pub fn order(&self, seller_id: &str) -> Option<&SellerOrder> { self.orders.iter().find(|o| o.seller_id == seller_id) }
    pub fn is_empty(&self) -> bool { self.orders.is_empty() }
    pub fn item_count(&self) -> u32 { self.orders.iter().flat_map(|o| &o.items).map(|i| i.quantity.value()).sum() }
    pub fn is_loading(&self) -> bool { self.loading }
    pub fn error(&self) -> Option<&str> { self.error.as_deref() }

    pub fn set_loading(&mut self, loading: bool) { self.loading = loading; }
    pub fn set_error(&mut self, error: Option<String>) { self.error = error; }

    /// Adds `quantity` units of `product`, merging with an existing line for the same product.
    pub fn add_item(&mut self, product: ProductRef, quantity: i64) -> Result<(), CartError> {
        let quantity = Quantity::try_from(quantity)?;
        let seller_id = product.seller_id.clone();
        let product_id = product.id.clone();

        let idx = match self.orders.iter().position(|o| o.seller_id == seller_id) {
            Some(idx) => idx,
            None => {
                self.orders.push(SellerOrder::new(&seller_id, &product.seller_name));
                self.orders.len() - 1
            }
        };
        let order = &mut self.orders[idx];
        if let Some(existing) = order.items.iter_mut().find(|i| i.product.id == product_id) {
            existing.quantity = existing.quantity.add(quantity);
        } else {
            order.items.push(LineItem { product, quantity });
        }
        order.recalculate();
        let total = order.total;

        self.raise_event(CartEvent::ItemAdded { seller_id: seller_id.clone(), product_id, quantity: quantity.value() });
        self.raise_event(CartEvent::TotalChanged { seller_id, total });
        Ok(())
    }

    /// Removes a line item. Returns `false` when nothing matched.
    pub fn remove_item(&mut self, seller_id: &str, product_id: &str) -> bool {
        let Some(idx) = self.orders.iter().position(|o| o.seller_id == seller_id) else { return false };
        let order = &mut self.orders[idx];
        let before = order.items.len();
        order.items.retain(|i| i.product.id != product_id);
        if order.items.len() == before { return false; }

        order.recalculate();
        let total = order.total;
        if order.is_empty() { self.orders.remove(idx); }

        self.raise_event(CartEvent::ItemRemoved { seller_id: seller_id.to_string(), product_id: product_id.to_string() });
        self.raise_event(CartEvent::TotalChanged { seller_id: seller_id.to_string(), total });
        true
    }

    /// Sets the quantity of a line item. Non-positive values are rejected before touching the cart.
    pub fn update_item_quantity(&mut self, seller_id: &str, product_id: &str, quantity: i64) -> Result<UpdateOutcome, CartError> {
        let quantity = Quantity::try_from(quantity)?;
        let Some(order) = self.orders.iter_mut().find(|o| o.seller_id == seller_id) else { return Ok(UpdateOutcome::NotFound) };
        let Some(item) = order.items.iter_mut().find(|i| i.product.id == product_id) else { return Ok(UpdateOutcome::NotFound) };
        item.quantity = quantity;
        order.recalculate();
        let total = order.total;

        self.raise_event(CartEvent::QuantityUpdated { seller_id: seller_id.to_string(), product_id: product_id.to_string(), quantity: quantity.value() });
        self.raise_event(CartEvent::TotalChanged { seller_id: seller_id.to_string(), total });
        Ok(UpdateOutcome::Updated)
    }

    /// Drops one seller order. Returns the removed order, if any.
    pub fn clear_order(&mut self, seller_id: &str) -> Option<SellerOrder> {
        let idx = self.orders.iter().position(|o| o.seller_id == seller_id)?;
        let removed = self.orders.remove(idx);
        self.raise_event(CartEvent::OrderCleared { seller_id: seller_id.to_string() });
        Some(removed)
    }

    pub fn clear_cart(&mut self) {
        self.orders.clear();
        self.raise_event(CartEvent::CartCleared);
    }

    /// Sum of every seller total, computed on each call.
    pub fn total_amount(&self) -> Money { self.orders.iter().map(SellerOrder::total).sum() }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: CartEvent) { self.events.push(DomainEvent::Cart(e)); }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum CartError { InvalidQuantity(QuantityError) }
impl std::error::Error for CartError {}
impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self { Self::InvalidQuantity(e) => write!(f, "Invalid quantity: {}", e) }
    }
}

impl From<QuantityError> for CartError {
    fn from(e: QuantityError) -> Self { Self::InvalidQuantity(e) }
}
