use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    auth::AuthUser,
    error::AppError,
    payment::settlement::{self, CreatePaymentOrder, PaymentOrderCreated, VerifyPayment},
    state::AppState,
};

pub async fn create_payment_order(State(s): State<AppState>, user: AuthUser, Json(r): Json<CreatePaymentOrder>) -> Result<Json<PaymentOrderCreated>, AppError> {
    let order = settlement::open_gateway_order(&s, user, r.amount).await?;
    Ok(Json(order.into()))
}

pub async fn verify_payment(State(s): State<AppState>, user: AuthUser, Json(r): Json<VerifyPayment>) -> Result<Json<Value>, AppError> {
    let settled = settlement::settle(&s, user, r).await?;
    Ok(Json(json!({ "success": true, "orderId": settled.order().id() })))
}
