#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront::{
    auth::TokenKeys,
    domain::aggregates::{Product, Role},
    payment::{signature, GatewayError, GatewayOrder, NewGatewayOrder, PaymentGateway, Payments},
    publisher::EventPublisher,
    seed::seed_catalog,
    store::{MemoryStore, ProductFilter, Store},
    AppState,
};

pub const KEY_SECRET: &str = "rzp_test_secret";

#[derive(Default)]
pub struct StubGateway {
    pub calls: Mutex<Vec<NewGatewayOrder>>,
    pub reject_with: Option<String>,
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, GatewayError> {
        self.calls.lock().push(order.clone());
        if let Some(message) = &self.reject_with {
            return Err(GatewayError::Rejected(message.clone()));
        }
        Ok(GatewayOrder { id: format!("order_{}", self.calls.lock().len()), amount: order.amount, currency: order.currency })
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<StubGateway>,
}

impl TestApp {
    pub async fn new() -> Self { Self::build(Some(StubGateway::default())).await }

    pub async fn without_payments() -> Self { Self::build(None).await }

    pub async fn rejecting_gateway(message: &str) -> Self {
        Self::build(Some(StubGateway { reject_with: Some(message.into()), ..Default::default() })).await
    }

    async fn build(gateway: Option<StubGateway>) -> Self {
        let store = Arc::new(MemoryStore::new());
        seed_catalog(store.as_ref()).await.unwrap();
        let configured = gateway.is_some();
        let gateway = Arc::new(gateway.unwrap_or_default());
        let payments = configured.then(|| Payments { gateway: gateway.clone(), key_secret: KEY_SECRET.into() });
        let state = AppState::new(store.clone(), payments, TokenKeys::new(b"test-jwt-secret"), EventPublisher::default(), "INR");
        Self { router: storefront::router(state), store, gateway }
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder.header(header::CONTENT_TYPE, "application/json").body(Body::from(body.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self.post("/api/auth/login", None, json!({ "email": email, "password": "correct horse" })).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Registers a customer and returns a session token.
    pub async fn customer(&self, email: &str) -> String {
        let (status, body) = self.post("/api/auth/signup", None, json!({ "name": "Asha", "email": email, "password": "correct horse" })).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        self.login(email).await
    }

    pub async fn admin(&self, email: &str) -> String {
        self.customer(email).await;
        let user = self.store.user_by_email(email).await.unwrap().unwrap();
        self.store.set_role(user.id, Role::Admin).await.unwrap();
        self.login(email).await
    }

    pub async fn catalog(&self) -> Vec<Product> {
        self.store.products(&ProductFilter::all()).await.unwrap()
    }
}

pub fn shipping() -> Value {
    json!({ "firstName": "Asha", "lastName": "Rao", "address": "12 MG Road", "city": "Pune", "state": "MH", "zip": "411001", "phone": "9800000000" })
}

/// A correctly signed verify payload for one line of `product`.
pub fn verify_body(order_id: &str, payment_id: &str, product: &Product, quantity: i64) -> Value {
    let total = product.price * rust_decimal::Decimal::from(quantity);
    json!({
        "razorpay_order_id": order_id,
        "razorpay_payment_id": payment_id,
        "razorpay_signature": signature::sign(KEY_SECRET, order_id, payment_id),
        "cartItems": [{ "id": product.id, "name": product.name, "price": product.price, "quantity": quantity }],
        "totalAmount": total,
        "shippingDetails": shipping(),
    })
}
