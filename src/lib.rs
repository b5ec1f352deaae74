//! Storefront Service
//!
//! Direct-to-consumer shop backend for a catalog of herbal products.
//!
//! ## Features
//! - Product catalog search and product pages with reviews
//! - Checkout through Razorpay: gateway order creation and signature-verified settlement
//! - Order history for customers
//! - Verified-purchase reviews
//! - Admin back-office for users, products and order status

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod payment;
pub mod publisher;
pub mod routes;
pub mod seed;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::AppError;
pub use routes::router;
pub use state::AppState;
