//! Persistent cart store
//!
//! Owns the [`CartState`] and writes the whole state back to storage after every
//! mutation. Storage failures are logged and swallowed; the in-memory state is kept.

use tracing::{info, warn};

use crate::domain::aggregates::{CartError, CartState, ProductRef, SellerOrder, UpdateOutcome};
use crate::domain::value_objects::Money;
use crate::storage::{load_json, save_json, SharedStore};

pub const CART_KEY: &str = "cart";

pub struct CartStore {
    state: CartState,
    storage: SharedStore,
}

impl CartStore {
    /// Restores the cart saved under [`CART_KEY`]. Absent or malformed data yields an empty cart.
    pub fn load(storage: SharedStore) -> Self {
        let mut state = match load_json::<CartState>(storage.as_ref(), CART_KEY) {
            Ok(Some(state)) => state,
            Ok(None) => CartState::new(),
            Err(e) => {
                warn!(error = %e, "discarding unreadable cart");
                CartState::new()
            }
        };
        state.set_loading(false);
        info!(orders = state.orders().len(), "cart loaded");
        Self { state, storage }
    }

    pub fn state(&self) -> &CartState { &self.state }
    pub fn orders(&self) -> &[SellerOrder] { self.state.orders() }
    pub fn order(&self, seller_id: &str) -> Option<&SellerOrder> { self.state.order(seller_id) }
    pub fn total_amount(&self) -> Money { self.state.total_amount() }
    pub fn is_empty(&self) -> bool { self.state.is_empty() }

    pub fn add_item(&mut self, product: ProductRef, quantity: i64) -> Result<(), CartError> {
        self.state.add_item(product, quantity)?;
        self.commit();
        Ok(())
    }

    pub fn remove_item(&mut self, seller_id: &str, product_id: &str) -> bool {
        let removed = self.state.remove_item(seller_id, product_id);
        self.commit();
        removed
    }

    pub fn update_item_quantity(&mut self, seller_id: &str, product_id: &str, quantity: i64) -> Result<UpdateOutcome, CartError> {
        let outcome = self.state.update_item_quantity(seller_id, product_id, quantity)?;
        self.commit();
        Ok(outcome)
    }

    pub fn clear_order(&mut self, seller_id: &str) -> Option<SellerOrder> {
        let removed = self.state.clear_order(seller_id);
        self.commit();
        removed
    }

    pub fn clear_cart(&mut self) {
        self.state.clear_cart();
        self.commit();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.state.set_loading(loading);
        self.commit();
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.state.set_error(error);
        self.commit();
    }

    fn commit(&mut self) {
        for event in self.state.take_events() { event.log(); }
        if let Err(e) = save_json(self.storage.as_ref(), CART_KEY, &self.state) {
            warn!(error = %e, "failed to persist cart");
        }
    }
}
