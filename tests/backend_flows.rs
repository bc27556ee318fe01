//! End-to-end flows against an in-process stub of the marketplace backend

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use pinina_storefront::api::ApiClient;
use pinina_storefront::auth::{spawn_renewal, Session, SessionState, TokenStore};
use pinina_storefront::checkout::{Checkout, CheckoutStatus, ClearPolicy, OrderResult};
use pinina_storefront::domain::aggregates::{ProductQuery, SortOrder};
use pinina_storefront::domain::value_objects::PaymentMethod;
use pinina_storefront::forms::LoginForm;
use pinina_storefront::storage::{CookieJar, MemoryStore, SessionStorage, SharedStore};
use pinina_storefront::store::CartStore;
use pinina_storefront::StorefrontError;

#[derive(Default)]
struct Backend {
    reject_products: HashSet<String>,
    orders: Vec<Value>,
    renewals: u32,
    requests: u32,
    renew_delay: Duration,
}

type Shared = Arc<Mutex<Backend>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok()).is_some_and(|v| v.starts_with("Bearer access-"))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" })))
}

async fn login(State(s): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    s.lock().unwrap().requests += 1;
    if body["email"] == "maria@pinina.com" && body["password"] == "secret123" {
        (StatusCode::OK, Json(json!({ "accessToken": "access-0", "refreshToken": "refresh-0" })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" })))
    }
}

async fn renew(State(s): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["refreshToken"] != "refresh-0" { return unauthorized(); }
    let delay = s.lock().unwrap().renew_delay;
    tokio::time::sleep(delay).await;
    let mut backend = s.lock().unwrap();
    backend.renewals += 1;
    (StatusCode::OK, Json(json!({ "accessToken": format!("access-{}", backend.renewals) })))
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) { return unauthorized(); }
    (StatusCode::OK, Json(json!({ "id": "u1", "name": "Maria", "surname": "Pinina", "email": "maria@pinina.com", "role": "ADMIN" })))
}

fn product_json(id: &str) -> Value {
    let (seller, price) = if id.starts_with('b') { ("s2", 20) } else { ("s1", 10) };
    json!({
        "id": id, "name": format!("Product {id}"), "price": price, "stock": 4,
        "photos": [{ "id": "ph", "url": format!("https://cdn/{id}.png") }],
        "user": { "id": seller, "name": "Seller", "surname": seller }
    })
}

async fn product(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "missing" { return (StatusCode::NOT_FOUND, Json(json!({ "message": "Product not found" }))); }
    (StatusCode::OK, Json(product_json(&id)))
}

async fn random(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let limit: u32 = q.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    let offset: u32 = q.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let order = q.get("priceOrder").cloned().unwrap_or_default();
    let mut data = vec![product_json("a1"), product_json("b1")];
    if order == "DESC" { data.reverse(); }
    Json(json!({ "data": data, "limit": limit, "offset": offset }))
}

async fn create_order(State(s): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) { return unauthorized(); }
    let mut backend = s.lock().unwrap();
    let rejected = body["products"].as_array().into_iter().flatten()
        .any(|l| l["productId"].as_str().is_some_and(|id| backend.reject_products.contains(id)));
    if rejected {
        return (StatusCode::CONFLICT, Json(json!({ "message": "Insufficient stock" })));
    }
    backend.orders.push(body);
    let id = format!("o{}", backend.orders.len());
    (StatusCode::CREATED, Json(json!({ "id": id, "status": "PENDING" })))
}

async fn spawn_backend(backend: Backend) -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(backend));
    let app = Router::new()
        .route("/login/local", post(login))
        .route("/login/renew-token", post(renew))
        .route("/users/find/no-password/me", get(me))
        .route("/products/get/id/:id", get(product))
        .route("/products/get-all/random", get(random))
        .route("/orders/create", post(create_order))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (format!("http://{addr}"), state)
}

fn client(base: &str) -> (ApiClient, SharedStore) {
    let store = MemoryStore::shared();
    let api = ApiClient::new(base, TokenStore::new(CookieJar::new(store.clone()))).unwrap();
    (api, store)
}

fn login_form() -> LoginForm {
    LoginForm { email: "maria@pinina.com".into(), password: "secret123".into() }
}

async fn logged_in_cart(api: &ApiClient, store: SharedStore) -> CartStore {
    api.login(&login_form()).await.unwrap();
    let mut cart = CartStore::load(store);
    cart.add_item(api.product("a1").await.unwrap().snapshot(), 2).unwrap();
    cart.add_item(api.product("b1").await.unwrap().snapshot(), 1).unwrap();
    cart
}

#[tokio::test]
async fn test_login_hydrates_session_and_caches_name() {
    let (base, _) = spawn_backend(Backend::default()).await;
    let (api, store) = client(&base);
    let mut session = Session::new(SessionStorage::new(store.clone()));

    let user = session.login(&api, &login_form()).await.unwrap();
    assert!(user.is_admin());
    assert!(matches!(session.state(), SessionState::Hydrated(u) if u.id == "u1"));
    assert_eq!(session.display_name().unwrap(), Some(("Maria".into(), "Pinina".into())));
    assert!(api.tokens().is_logged_in().unwrap());

    session.logout(&api).unwrap();
    assert_eq!(session.state(), &SessionState::Unauthenticated);
    assert_eq!(api.tokens().access_token().unwrap(), None);
    assert_eq!(session.display_name().unwrap(), None);
}

#[tokio::test]
async fn test_bad_credentials_surface_backend_message() {
    let (base, _) = spawn_backend(Backend::default()).await;
    let (api, _) = client(&base);
    let err = api.login(&LoginForm { email: "maria@pinina.com".into(), password: "wrong".into() }).await.unwrap_err();
    assert!(matches!(err, StorefrontError::Backend { status: 401, ref message } if message == "Invalid credentials"));
    assert!(!api.tokens().is_logged_in().unwrap());
}

#[tokio::test]
async fn test_invalid_form_never_hits_network() {
    let (base, state) = spawn_backend(Backend::default()).await;
    let (api, _) = client(&base);
    let err = api.login(&LoginForm { email: "not-an-email".into(), password: String::new() }).await.unwrap_err();
    assert!(matches!(err, StorefrontError::Validation(_)));
    assert_eq!(state.lock().unwrap().requests, 0);
}

#[tokio::test]
async fn test_order_requires_credentials() {
    let (base, state) = spawn_backend(Backend::default()).await;
    let (api, store) = client(&base);
    let mut cart = CartStore::load(store);
    cart.add_item(api.product("a1").await.unwrap().snapshot(), 1).unwrap();
    let report = Checkout::new(api.clone(), PaymentMethod::Card).checkout(&mut cart, None).await;
    assert_eq!(report.status, CheckoutStatus::Failure);
    assert!(state.lock().unwrap().orders.is_empty());
    assert_eq!(cart.orders().len(), 1);
}

#[tokio::test]
async fn test_checkout_places_one_order_per_seller() {
    let (base, state) = spawn_backend(Backend::default()).await;
    let (api, store) = client(&base);
    let mut cart = logged_in_cart(&api, store.clone()).await;
    assert_eq!(cart.total_amount().amount(), Decimal::new(40, 0));

    let report = Checkout::new(api.clone(), PaymentMethod::Transfer).checkout(&mut cart, None).await;
    assert!(report.is_success());
    assert!(cart.is_empty());
    assert!(CartStore::load(store).is_empty());

    let backend = state.lock().unwrap();
    assert_eq!(backend.orders.len(), 2);
    assert_eq!(backend.orders[0], json!({ "paymentMethod": "transfer", "products": [{ "productId": "a1", "quantity": 2 }] }));
}

#[tokio::test]
async fn test_failed_second_order_with_all_or_nothing() {
    let backend = Backend { reject_products: HashSet::from(["b1".to_string()]), ..Backend::default() };
    let (base, state) = spawn_backend(backend).await;
    let (api, store) = client(&base);
    let mut cart = logged_in_cart(&api, store).await;

    let report = Checkout::new(api.clone(), PaymentMethod::Card)
        .with_clear_policy(ClearPolicy::AllOrNothing)
        .checkout(&mut cart, None).await;

    assert_eq!(report.status, CheckoutStatus::PartialFailure);
    assert_eq!(report.outcomes[0].result, OrderResult::Submitted { order_id: "o1".into() });
    assert_eq!(report.outcomes[1].result, OrderResult::Failed);
    assert_eq!(cart.orders().len(), 2);
    assert_eq!(state.lock().unwrap().orders.len(), 1);
}

#[tokio::test]
async fn test_failed_second_order_keeps_only_pending_seller() {
    let backend = Backend { reject_products: HashSet::from(["b1".to_string()]), ..Backend::default() };
    let (base, _) = spawn_backend(backend).await;
    let (api, store) = client(&base);
    let mut cart = logged_in_cart(&api, store).await;

    let report = Checkout::new(api.clone(), PaymentMethod::Card).checkout(&mut cart, None).await;
    assert_eq!(report.status, CheckoutStatus::PartialFailure);
    assert!(cart.order("s1").is_none());
    assert_eq!(cart.order("s2").unwrap().total().amount(), Decimal::new(20, 0));
}

#[tokio::test]
async fn test_listing_forwards_query() {
    let (base, _) = spawn_backend(Backend::default()).await;
    let (api, _) = client(&base);
    let query = ProductQuery { price_order: Some(SortOrder::Desc), ..ProductQuery::page(5, 10) };
    let page = api.random_products(&query).await.unwrap();
    assert_eq!((page.limit, page.offset), (5, 10));
    assert_eq!(page.data[0].id, "b1");
}

#[tokio::test]
async fn test_missing_product_is_backend_error() {
    let (base, _) = spawn_backend(Backend::default()).await;
    let (api, _) = client(&base);
    let err = api.product("missing").await.unwrap_err();
    assert!(matches!(err, StorefrontError::Backend { status: 404, .. }));
}

#[tokio::test]
async fn test_renewal_refreshes_access_token_until_logout() {
    let (base, state) = spawn_backend(Backend::default()).await;
    let (api, _) = client(&base);
    api.login(&login_form()).await.unwrap();

    let handle = spawn_renewal(api.clone(), Duration::from_millis(50));
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(state.lock().unwrap().renewals >= 1);
    assert_ne!(api.tokens().access_token().unwrap().as_deref(), Some("access-0"));

    api.tokens().clear().unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(handle.is_finished());
}

#[tokio::test]
async fn test_renewal_landing_after_logout_is_discarded() {
    let (base, state) = spawn_backend(Backend { renew_delay: Duration::from_millis(200), ..Backend::default() }).await;
    let (api, _) = client(&base);
    api.login(&login_form()).await.unwrap();

    let handle = spawn_renewal(api.clone(), Duration::from_millis(50));
    tokio::time::sleep(Duration::from_millis(100)).await;
    api.tokens().clear().unwrap();
    assert_eq!(api.tokens().access_token().unwrap(), None);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(state.lock().unwrap().renewals, 1);
    assert_eq!(api.tokens().access_token().unwrap(), None);
    assert!(!api.tokens().is_logged_in().unwrap());
    assert!(handle.is_finished());
}

#[tokio::test]
async fn test_expired_access_token_is_renewed_on_demand() {
    let (base, state) = spawn_backend(Backend::default()).await;
    let (api, store) = client(&base);
    assert!(!api.refresh_if_expired().await.unwrap());

    api.login(&login_form()).await.unwrap();
    assert!(!api.refresh_if_expired().await.unwrap());
    assert_eq!(state.lock().unwrap().renewals, 0);

    CookieJar::new(store).set_until("accessToken", "access-0", chrono::Utc::now() - chrono::Duration::seconds(1)).unwrap();
    assert!(api.refresh_if_expired().await.unwrap());
    assert_eq!(api.tokens().access_token().unwrap().as_deref(), Some("access-1"));
}
