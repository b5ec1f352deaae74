use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    domain::aggregates::{Order, Review},
    error::AppError,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

pub async fn my_orders(State(s): State<AppState>, user: AuthUser) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(s.store.orders_for_user(user.id).await?))
}

pub async fn submit_review(State(s): State<AppState>, user: AuthUser, Path(product_id): Path<Uuid>, Json(r): Json<ReviewRequest>) -> Result<(StatusCode, Json<Review>), AppError> {
    s.store.product(product_id).await?.ok_or(AppError::NotFound("Product"))?;
    let purchased = s.store.has_paid_order_with_product(user.id, product_id).await?;
    let (review, event) = Review::post(user.id, product_id, purchased, r.rating, &r.comment)?;
    s.store.insert_review(&review).await?;
    info!(review_id = %review.id, %product_id, user_id = %user.id, "review posted");
    s.events.publish(vec![event]).await;
    Ok((StatusCode::CREATED, Json(review)))
}
