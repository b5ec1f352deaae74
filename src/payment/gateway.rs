//! Payment gateway client.

use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://api.razorpay.com/v1";

/// Order to open at the gateway, amount in the currency's minor unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewGatewayOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Rejected(String),
    #[error("Payment gateway unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, GatewayError>;
}

pub fn receipt_id() -> String {
    let suffix: String = rand::thread_rng().sample_iter(&Alphanumeric).take(7).map(|c| char::from(c).to_ascii_lowercase()).collect();
    format!("receipt_{suffix}")
}

/// Razorpay Orders API over HTTPS with key basic auth.
pub struct RazorpayClient {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope { error: ErrorBody }

#[derive(Deserialize)]
struct ErrorBody { description: Option<String>, code: Option<String> }

impl RazorpayClient {
    pub fn new(base_url: impl Into<String>, key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, GatewayError> {
        debug!(amount = order.amount, receipt = %order.receipt, "creating gateway order");
        let response = self.http
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&order)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<GatewayOrder>().await?);
        }

        let message = match response.json::<ErrorEnvelope>().await {
            Ok(ErrorEnvelope { error }) => error.description.or(error.code).unwrap_or_else(|| status.to_string()),
            Err(_) => status.to_string(),
        };
        warn!(%status, %message, "gateway rejected order");
        Err(GatewayError::Rejected(message))
    }
}
