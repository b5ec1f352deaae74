//! HTTP surface.

mod admin;
mod auth;
mod catalog;
mod checkout;
mod orders;

use axum::{routing::{delete, get, post, put}, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/users", get(admin::list_users))
        .route("/users/:id", delete(admin::delete_user))
        .route("/users/:id/role", post(admin::toggle_role))
        .route("/products", get(admin::list_products).post(admin::create_product))
        .route("/products/:id", put(admin::update_product).delete(admin::delete_product))
        .route("/orders", get(admin::list_orders))
        .route("/orders/:id", get(admin::get_order))
        .route("/orders/:id/status", put(admin::update_order_status));

    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront"})) }))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/products", get(catalog::list_products))
        .route("/api/products/featured", get(catalog::featured_products))
        .route("/api/products/:id", get(catalog::get_product))
        .route("/api/products/:id/reviews", post(orders::submit_review))
        .route("/api/categories", get(catalog::list_categories))
        .route("/api/orders", get(orders::my_orders))
        .route("/api/razorpay/order", post(checkout::create_payment_order))
        .route("/api/razorpay/verify", post(checkout::verify_payment))
        .nest("/api/admin", admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
