//! Checkout settlement: open a gateway order, then verify the payment
//! signature and record the paid order with its items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use validator::Validate;

use super::{gateway::receipt_id, signature, GatewayOrder, NewGatewayOrder, Payments};
use crate::{
    auth::AuthUser,
    domain::{
        aggregates::{Cart, CartItem, GatewayPayment, Order, ShippingDetails},
        value_objects::Money,
    },
    error::AppError,
    state::AppState,
    store::StoreError,
};

const KEYS_MISSING: &str = "Razorpay keys missing";

#[derive(Debug, Deserialize)]
pub struct CreatePaymentOrder {
    pub amount: Decimal,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrderCreated {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
}

impl From<GatewayOrder> for PaymentOrderCreated {
    fn from(o: GatewayOrder) -> Self { Self { order_id: o.id, amount: o.amount, currency: o.currency } }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPayment {
    #[serde(rename = "razorpay_order_id")]
    pub razorpay_order_id: String,
    #[serde(rename = "razorpay_payment_id")]
    pub razorpay_payment_id: String,
    #[serde(rename = "razorpay_signature")]
    pub razorpay_signature: String,
    pub cart_items: Vec<CartItem>,
    pub total_amount: Option<Decimal>,
    pub shipping_details: ShippingDetails,
}

#[derive(Debug)]
pub enum Settlement {
    Recorded(Order),
    /// The payment had already been recorded for this caller.
    Replayed(Order),
}

impl Settlement {
    pub fn order(&self) -> &Order {
        match self { Self::Recorded(o) | Self::Replayed(o) => o }
    }
}

fn payments(state: &AppState) -> Result<&Payments, AppError> {
    state.payments.as_ref().ok_or(AppError::Misconfigured(KEYS_MISSING))
}

pub async fn open_gateway_order(state: &AppState, user: AuthUser, amount: Decimal) -> Result<GatewayOrder, AppError> {
    let payments = payments(state)?;
    let minor = Money::new(amount, &state.currency).to_minor_units().map_err(|e| AppError::Validation(e.to_string()))?;
    let order = payments.gateway.create_order(NewGatewayOrder {
        amount: minor,
        currency: state.currency.clone(),
        receipt: receipt_id(),
    }).await?;
    info!(user_id = %user.id, gateway_order_id = %order.id, amount = order.amount, "gateway order created");
    Ok(order)
}

fn replay(existing: Order, user: AuthUser) -> Result<Settlement, AppError> {
    if existing.user_id() != user.id {
        warn!(order_id = %existing.id(), user_id = %user.id, "payment already recorded for another user");
        return Err(AppError::Conflict("Payment already recorded".into()));
    }
    info!(order_id = %existing.id(), "payment already recorded, returning existing order");
    Ok(Settlement::Replayed(existing))
}

pub async fn settle(state: &AppState, user: AuthUser, req: VerifyPayment) -> Result<Settlement, AppError> {
    let payments = payments(state)?;

    if !signature::verify(&payments.key_secret, &req.razorpay_order_id, &req.razorpay_payment_id, &req.razorpay_signature) {
        warn!(gateway_order_id = %req.razorpay_order_id, user_id = %user.id, "payment signature rejected");
        return Err(AppError::InvalidSignature);
    }

    if let Some(existing) = state.store.order_by_payment(&req.razorpay_payment_id).await? {
        return replay(existing, user);
    }

    req.shipping_details.validate()?;
    let cart = Cart::from_lines(req.cart_items, &state.currency)?;
    let total = cart.total()?;
    if let Some(claimed) = req.total_amount.map(|amount| Money::new(amount, &state.currency)) {
        // Clients sum in floating point, so compare at paise precision.
        if !claimed.same_minor_amount(&total) {
            return Err(AppError::Validation(format!("Total amount {} does not match cart total {}", claimed.amount(), total.amount())));
        }
    }
    for item in cart.items() {
        if state.store.product(item.product_id).await?.is_none() {
            return Err(AppError::Validation(format!("Unknown product {}", item.product_id)));
        }
    }

    let payment = GatewayPayment { order_id: req.razorpay_order_id, payment_id: req.razorpay_payment_id };
    let mut order = Order::settle(user.id, payment.clone(), req.shipping_details, &cart)?;

    match state.store.insert_order(&order).await {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => {
            let existing = state.store.order_by_payment(&payment.payment_id).await?
                .ok_or_else(|| AppError::Internal("payment recorded concurrently but not found".into()))?;
            return replay(existing, user);
        }
        Err(e) => {
            // The gateway has captured the payment; this has to be reconciled by hand.
            error!(gateway_order_id = %payment.order_id, payment_id = %payment.payment_id, user_id = %user.id, error = %e,
                "paid order could not be recorded");
            return Err(e.into());
        }
    }

    info!(order_id = %order.id(), user_id = %user.id, total = %order.total_amount(), "paid order recorded");
    state.events.publish(order.take_events()).await;
    Ok(Settlement::Recorded(order))
}
