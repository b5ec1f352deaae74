//! Checkout payments: gateway order creation and settlement of verified payments.
pub mod gateway;
pub mod settlement;
pub mod signature;

use std::sync::Arc;

pub use gateway::{GatewayError, GatewayOrder, NewGatewayOrder, PaymentGateway, RazorpayClient};

/// Gateway client plus the key secret used to verify payment signatures.
#[derive(Clone)]
pub struct Payments {
    pub gateway: Arc<dyn PaymentGateway>,
    pub key_secret: String,
}
