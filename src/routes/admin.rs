use std::collections::HashMap;

use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AdminUser,
    domain::{
        aggregates::{Order, OrderStatus, Product, ProductDraft, ProductForm, User},
        events::{DomainEvent, ProductEvent},
    },
    error::AppError,
    state::AppState,
    store::{DashboardStats, ProductFilter},
};

const RECENT_ORDERS: i64 = 5;

#[derive(Debug, Serialize)]
pub struct Customer { pub name: Option<String>, pub email: String }

impl From<&User> for Customer {
    fn from(u: &User) -> Self { Self { name: u.name.clone(), email: u.email.clone() } }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrder {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Option<Customer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub recent_orders: Vec<CustomerOrder>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate { pub status: String }

async fn with_customers(s: &AppState, orders: Vec<Order>) -> Result<Vec<CustomerOrder>, AppError> {
    let users: HashMap<Uuid, User> = s.store.users().await?.into_iter().map(|u| (u.id, u)).collect();
    Ok(orders.into_iter().map(|order| {
        let customer = users.get(&order.user_id()).map(Customer::from);
        CustomerOrder { order, customer }
    }).collect())
}

pub async fn dashboard(State(s): State<AppState>, _admin: AdminUser) -> Result<Json<Dashboard>, AppError> {
    let stats = s.store.dashboard().await?;
    let recent = s.store.orders(Some(RECENT_ORDERS)).await?;
    Ok(Json(Dashboard { stats, recent_orders: with_customers(&s, recent).await? }))
}

// --- Users ---

pub async fn list_users(State(s): State<AppState>, _admin: AdminUser) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(s.store.users().await?))
}

pub async fn delete_user(State(s): State<AppState>, AdminUser(admin): AdminUser, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    if !s.store.delete_user(id).await? {
        return Err(AppError::NotFound("User"));
    }
    info!(user_id = %id, admin_id = %admin.id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_role(State(s): State<AppState>, AdminUser(admin): AdminUser, Path(id): Path<Uuid>) -> Result<Json<User>, AppError> {
    let mut user = s.store.user(id).await?.ok_or(AppError::NotFound("User"))?;
    user.role = user.role.toggled();
    s.store.set_role(id, user.role).await?;
    info!(user_id = %id, role = user.role.as_str(), admin_id = %admin.id, "user role changed");
    Ok(Json(user))
}

// --- Products ---

pub async fn list_products(State(s): State<AppState>, _admin: AdminUser) -> Result<Json<Vec<Product>>, AppError> {
    let mut products = s.store.products(&ProductFilter::all()).await?;
    products.reverse();
    Ok(Json(products))
}

pub async fn create_product(State(s): State<AppState>, _admin: AdminUser, Json(form): Json<ProductForm>) -> Result<(StatusCode, Json<Product>), AppError> {
    let (product, event) = Product::create(ProductDraft::try_from(form)?);
    s.store.insert_product(&product).await?;
    s.events.publish(vec![event]).await;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(State(s): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>, Json(form): Json<ProductForm>) -> Result<Json<Product>, AppError> {
    let draft = ProductDraft::try_from(form)?;
    let mut product = s.store.product(id).await?.ok_or(AppError::NotFound("Product"))?;
    let event = product.apply(draft);
    if !s.store.update_product(&product).await? {
        return Err(AppError::NotFound("Product"));
    }
    s.events.publish(vec![event]).await;
    Ok(Json(product))
}

pub async fn delete_product(State(s): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    if !s.store.delete_product(id).await? {
        return Err(AppError::NotFound("Product"));
    }
    s.events.publish(vec![DomainEvent::Product(ProductEvent::Deleted { product_id: id })]).await;
    Ok(StatusCode::NO_CONTENT)
}

// --- Orders ---

pub async fn list_orders(State(s): State<AppState>, _admin: AdminUser) -> Result<Json<Vec<CustomerOrder>>, AppError> {
    let orders = s.store.orders(None).await?;
    Ok(Json(with_customers(&s, orders).await?))
}

pub async fn get_order(State(s): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> Result<Json<CustomerOrder>, AppError> {
    let order = s.store.order(id).await?.ok_or(AppError::NotFound("Order"))?;
    let customer = s.store.user(order.user_id()).await?.as_ref().map(Customer::from);
    Ok(Json(CustomerOrder { order, customer }))
}

pub async fn update_order_status(State(s): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>, Json(r): Json<StatusUpdate>) -> Result<Json<Order>, AppError> {
    let status = r.status.parse::<OrderStatus>()?;
    let mut order = s.store.order(id).await?.ok_or(AppError::NotFound("Order"))?;
    if order.set_status(status) {
        s.store.update_order_status(id, status).await?;
        info!(order_id = %id, status = status.as_str(), "order status updated");
        s.events.publish(order.take_events()).await;
    }
    Ok(Json(order))
}
