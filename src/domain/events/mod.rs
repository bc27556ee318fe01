//! Domain events
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Cart(CartEvent),
    Session(SessionEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CartEvent {
    ItemAdded { seller_id: String, product_id: String, quantity: u32 },
    ItemRemoved { seller_id: String, product_id: String },
    QuantityUpdated { seller_id: String, product_id: String, quantity: u32 },
    OrderCleared { seller_id: String },
    CartCleared,
    TotalChanged { seller_id: String, total: Money },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Hydrated { user_id: String },
    LoggedIn { email: String },
    LoggedOut,
    TokenRenewed,
}

impl DomainEvent {
    /// Emits the event to the tracing subscriber.
    pub fn log(&self) {
        match self {
            DomainEvent::Cart(CartEvent::ItemAdded { seller_id, product_id, quantity }) => {
                tracing::debug!(%seller_id, %product_id, quantity, "cart item added")
            }
            DomainEvent::Cart(CartEvent::ItemRemoved { seller_id, product_id }) => {
                tracing::debug!(%seller_id, %product_id, "cart item removed")
            }
            DomainEvent::Cart(CartEvent::QuantityUpdated { seller_id, product_id, quantity }) => {
                tracing::debug!(%seller_id, %product_id, quantity, "cart quantity updated")
            }
            DomainEvent::Cart(CartEvent::OrderCleared { seller_id }) => tracing::debug!(%seller_id, "seller order cleared"),
            DomainEvent::Cart(CartEvent::CartCleared) => tracing::debug!("cart cleared"),
            DomainEvent::Cart(CartEvent::TotalChanged { seller_id, total }) => {
                tracing::trace!(%seller_id, %total, "seller total recomputed")
            }
            DomainEvent::Session(SessionEvent::Hydrated { user_id }) => tracing::info!(%user_id, "session hydrated"),
            DomainEvent::Session(SessionEvent::LoggedIn { email }) => tracing::info!(%email, "logged in"),
            DomainEvent::Session(SessionEvent::LoggedOut) => tracing::info!("logged out"),
            DomainEvent::Session(SessionEvent::TokenRenewed) => tracing::debug!("access token renewed"),
        }
    }
}
