//! Checkout orchestration
//!
//! Seller orders are submitted one request at a time. A run over the whole cart
//! stops at the first rejected order; orders after it are reported as not attempted.
//! Nothing already placed on the backend is rolled back, so the report lists the
//! outcome of every seller order and the cart is cleared according to [`ClearPolicy`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::api::ApiClient;
use crate::domain::aggregates::{CartState, OrderRecord, OrderRequest, Product};
use crate::domain::value_objects::{Money, PaymentMethod};
use crate::store::CartStore;
use crate::Result;

const CHECKOUT_FAILED: &str = "Some orders could not be placed";

#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn create_order(&self, order: &OrderRequest) -> Result<OrderRecord>;
}

#[async_trait]
impl OrderGateway for ApiClient {
    async fn create_order(&self, order: &OrderRequest) -> Result<OrderRecord> { self.place_order(order).await }
}

/// Source of live product data used to detect drift in cart snapshots.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn product(&self, id: &str) -> Result<Product>;
}

#[async_trait]
impl Catalog for ApiClient {
    async fn product(&self, id: &str) -> Result<Product> { ApiClient::product(self, id).await }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ClearPolicy {
    /// Remove every seller order the backend accepted; keep the rest for a retry.
    #[default]
    SucceededOnly,
    /// Empty the cart only if every seller order was accepted.
    AllOrNothing,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OrderSubmission {
    Created(OrderRecord),
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderResult {
    Submitted { order_id: String },
    Failed,
    NotAttempted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderOutcome {
    pub seller_id: String,
    pub total: Money,
    pub result: OrderResult,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckoutStatus {
    Success,
    PartialFailure,
    Failure,
}

#[derive(Clone, Debug)]
pub struct CheckoutReport {
    pub checkout_id: Uuid,
    pub status: CheckoutStatus,
    pub outcomes: Vec<OrderOutcome>,
}

impl CheckoutReport {
    pub fn is_success(&self) -> bool { self.status == CheckoutStatus::Success }

    pub fn submitted(&self) -> impl Iterator<Item = &OrderOutcome> {
        self.outcomes.iter().filter(|o| matches!(o.result, OrderResult::Submitted { .. }))
    }

    /// Seller orders still to be placed: the failed one and any never attempted.
    pub fn pending(&self) -> impl Iterator<Item = &OrderOutcome> {
        self.outcomes.iter().filter(|o| !matches!(o.result, OrderResult::Submitted { .. }))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceDrift {
    pub seller_id: String,
    pub product_id: String,
    pub cart_price: Money,
    pub live_price: Money,
}

pub struct Checkout<G> {
    gateway: G,
    payment_method: PaymentMethod,
    clear_policy: ClearPolicy,
}

impl<G: OrderGateway> Checkout<G> {
    pub fn new(gateway: G, payment_method: PaymentMethod) -> Self {
        Self { gateway, payment_method, clear_policy: ClearPolicy::default() }
    }

    pub fn with_clear_policy(mut self, clear_policy: ClearPolicy) -> Self {
        self.clear_policy = clear_policy;
        self
    }

    pub fn payment_method(&self) -> PaymentMethod { self.payment_method }

    /// Sends one order. The failure cause is logged, not returned.
    pub async fn create_order(&self, order: &OrderRequest) -> OrderSubmission {
        match self.gateway.create_order(order).await {
            Ok(record) => {
                info!(order_id = %record.id, lines = order.products.len(), "order created");
                OrderSubmission::Created(record)
            }
            Err(e) => {
                error!(error = %e, "order creation failed");
                OrderSubmission::Failed
            }
        }
    }

    /// Places the order of `seller_id`, or every seller order in cart order when `None`.
    pub async fn checkout(&self, cart: &mut CartStore, seller_id: Option<&str>) -> CheckoutReport {
        let checkout_id = Uuid::new_v4();
        let span = info_span!("checkout", %checkout_id);
        self.run(cart, seller_id, checkout_id).instrument(span).await
    }

    async fn run(&self, cart: &mut CartStore, seller_id: Option<&str>, checkout_id: Uuid) -> CheckoutReport {
        let batch: Vec<_> = match seller_id {
            Some(id) => cart.order(id).cloned().into_iter().collect(),
            None => cart.orders().to_vec(),
        };
        if batch.is_empty() {
            let status = if seller_id.is_some() { CheckoutStatus::Failure } else { CheckoutStatus::Success };
            warn!(seller_id = ?seller_id, "nothing to check out");
            return CheckoutReport { checkout_id, status, outcomes: vec![] };
        }

        cart.set_loading(true);
        let mut outcomes: Vec<OrderOutcome> = batch.iter()
            .map(|o| OrderOutcome { seller_id: o.seller_id().to_string(), total: o.total(), result: OrderResult::NotAttempted })
            .collect();

        for (order, outcome) in batch.iter().zip(outcomes.iter_mut()) {
            let request = OrderRequest::from_seller_order(order, self.payment_method);
            match self.create_order(&request).await {
                OrderSubmission::Created(record) => outcome.result = OrderResult::Submitted { order_id: record.id },
                OrderSubmission::Failed => {
                    outcome.result = OrderResult::Failed;
                    break;
                }
            }
        }

        let placed = outcomes.iter().filter(|o| matches!(o.result, OrderResult::Submitted { .. })).count();
        let status = match placed {
            n if n == outcomes.len() => CheckoutStatus::Success,
            0 => CheckoutStatus::Failure,
            _ => CheckoutStatus::PartialFailure,
        };

        match (status, self.clear_policy) {
            (CheckoutStatus::Success, _) | (_, ClearPolicy::SucceededOnly) => {
                for outcome in outcomes.iter().filter(|o| matches!(o.result, OrderResult::Submitted { .. })) {
                    cart.clear_order(&outcome.seller_id);
                }
            }
            (_, ClearPolicy::AllOrNothing) => {}
        }

        cart.set_error(if status == CheckoutStatus::Success { None } else { Some(CHECKOUT_FAILED.to_string()) });
        cart.set_loading(false);
        info!(?status, placed, total = outcomes.len(), "checkout finished");
        CheckoutReport { checkout_id, status, outcomes }
    }
}

/// Compares every cart snapshot price with the live catalog price.
pub async fn revalidate_prices<C: Catalog>(catalog: &C, cart: &CartState) -> Result<Vec<PriceDrift>> {
    let mut drift = Vec::new();
    for order in cart.orders() {
        for item in order.items() {
            let live = catalog.product(&item.product.id).await?;
            if live.price != item.product.price {
                drift.push(PriceDrift {
                    seller_id: order.seller_id().to_string(),
                    product_id: item.product.id.clone(),
                    cart_price: item.product.price,
                    live_price: live.price,
                });
            }
        }
    }
    Ok(drift)
}
