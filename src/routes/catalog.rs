use axum::{extract::{Path, Query, State}, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::MaybeUser,
    domain::aggregates::{review::average_rating, Product, ReviewWithAuthor},
    error::AppError,
    state::AppState,
    store::{ProductFilter, ProductQuery},
};

pub const FEATURED_COUNT: usize = 3;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub reviews: Vec<ReviewWithAuthor>,
    pub average_rating: f64,
    /// Whether the caller may review this product.
    pub has_purchased: bool,
}

pub async fn list_products(State(s): State<AppState>, Query(q): Query<ProductQuery>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(s.store.products(&ProductFilter::from(q)).await?))
}

pub async fn featured_products(State(s): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(s.store.featured_products(FEATURED_COUNT).await?))
}

pub async fn list_categories(State(s): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(s.store.categories().await?))
}

pub async fn get_product(State(s): State<AppState>, MaybeUser(user): MaybeUser, Path(id): Path<Uuid>) -> Result<Json<ProductDetail>, AppError> {
    let product = s.store.product(id).await?.ok_or(AppError::NotFound("Product"))?;
    let reviews = s.store.reviews_for_product(id).await?;
    let has_purchased = match user {
        Some(user) => s.store.has_paid_order_with_product(user.id, id).await?,
        None => false,
    };
    let average_rating = average_rating(reviews.iter().map(|r| &r.review));
    Ok(Json(ProductDetail { product, reviews, average_rating, has_purchased }))
}
