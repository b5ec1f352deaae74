use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPool, FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{DashboardStats, ProductFilter, Store, StoreError, StoreResult};
use crate::domain::aggregates::{
    Order, OrderItem, OrderParts, OrderStatus, Product, ProductRef, Review, ReviewWithAuthor, Role, ShippingDetails, User,
};
use crate::domain::value_objects::Rating;

const PRODUCT_COLUMNS: &str = "id, name, price, description, category, quantity, img, ingredients, how_to_use, benefits, stock, created_at";
const ORDER_COLUMNS: &str = "id, user_id, total_amount, status, razorpay_order_id, payment_id, first_name, last_name, address, city, state, zip, phone, created_at";

#[derive(Debug, FromRow)]
struct UserRow { id: Uuid, name: Option<String>, email: String, password_hash: String, role: String, created_at: DateTime<Utc> }

impl TryFrom<UserRow> for User {
    type Error = StoreError;
    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let role = r.role.parse::<Role>().map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(User { id: r.id, name: r.name, email: r.email, password_hash: r.password_hash, role, created_at: r.created_at })
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid, name: String, price: Decimal, description: String, category: String, quantity: String, img: String,
    ingredients: Option<String>, how_to_use: Option<String>, benefits: Vec<String>, stock: i32, created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id, name: r.name, price: r.price, description: r.description, category: r.category,
            quantity: r.quantity, img: r.img, ingredients: r.ingredients, how_to_use: r.how_to_use,
            benefits: r.benefits, stock: r.stock, created_at: r.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid, user_id: Uuid, total_amount: Decimal, status: String,
    razorpay_order_id: Option<String>, payment_id: Option<String>,
    first_name: String, last_name: String, address: String, city: String, state: String, zip: String, phone: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    id: Uuid, order_id: Uuid, product_id: Uuid, quantity: i32, price: Decimal,
    product_name: Option<String>, product_img: Option<String>,
}

#[derive(Debug, FromRow)]
struct ReviewRow { id: Uuid, user_id: Uuid, product_id: Uuid, rating: i16, comment: String, created_at: DateTime<Utc>, author: Option<String> }

impl TryFrom<ReviewRow> for ReviewWithAuthor {
    type Error = StoreError;
    fn try_from(r: ReviewRow) -> Result<Self, Self::Error> {
        let rating = Rating::new(i32::from(r.rating)).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(ReviewWithAuthor {
            review: Review { id: r.id, user_id: r.user_id, product_id: r.product_id, rating, comment: r.comment, created_at: r.created_at },
            author: r.author,
        })
    }
}

/// Unique and foreign-key violations become domain-level store errors.
fn classify(err: sqlx::Error, what: &'static str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate(what),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => StoreError::InUse(what),
        _ => StoreError::Database(err),
    }
}

fn like_pattern(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{escaped}%")
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self { Self { pool } }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    /// Loads items for the given orders and assembles the aggregates, keeping row order.
    async fn assemble(&self, rows: Vec<OrderRow>) -> StoreResult<Vec<Order>> {
        if rows.is_empty() { return Ok(vec![]); }
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price, p.name AS product_name, p.img AS product_img \
             FROM order_items oi LEFT JOIN products p ON p.id = oi.product_id WHERE oi.order_id = ANY($1) ORDER BY oi.id")
            .bind(&ids).fetch_all(&self.pool).await?;

        let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for i in items {
            let product = match (i.product_name, i.product_img) {
                (Some(name), Some(img)) => Some(ProductRef { name, img }),
                _ => None,
            };
            by_order.entry(i.order_id).or_default().push(OrderItem {
                id: i.id, order_id: i.order_id, product_id: i.product_id, quantity: i.quantity, price: i.price, product,
            });
        }

        rows.into_iter().map(|r| {
            let status = r.status.parse::<OrderStatus>().map_err(|e| StoreError::Corrupt(e.to_string()))?;
            Ok(Order::restore(OrderParts {
                id: r.id, user_id: r.user_id, total_amount: r.total_amount, status,
                razorpay_order_id: r.razorpay_order_id, payment_id: r.payment_id,
                shipping: ShippingDetails {
                    first_name: r.first_name, last_name: r.last_name, address: r.address, city: r.city,
                    state: r.state, zip: r.zip, phone: r.phone,
                },
                items: by_order.remove(&r.id).unwrap_or_default(),
                created_at: r.created_at,
            }))
        }).collect()
    }

    async fn one_order(&self, row: Option<OrderRow>) -> StoreResult<Option<Order>> {
        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query("INSERT INTO users (id, name, email, password_hash, role, created_at) VALUES ($1, $2, $3, $4, $5, $6)")
            .bind(user.id).bind(&user.name).bind(&user.email).bind(&user.password_hash).bind(user.role.as_str()).bind(user.created_at)
            .execute(&self.pool).await.map_err(|e| classify(e, "email"))?;
        Ok(())
    }

    async fn user(&self, id: Uuid) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT id, name, email, password_hash, role, created_at FROM users WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await?.map(User::try_from).transpose()
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT id, name, email, password_hash, role, created_at FROM users WHERE email = $1")
            .bind(email).fetch_optional(&self.pool).await?.map(User::try_from).transpose()
    }

    async fn users(&self) -> StoreResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>("SELECT id, name, email, password_hash, role, created_at FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool).await?.into_iter().map(User::try_from).collect()
    }

    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<bool> {
        let done = sqlx::query("UPDATE users SET role = $2 WHERE id = $1").bind(id).bind(role.as_str()).execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let done = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(&self.pool).await.map_err(|e| classify(e, "user"))?;
        Ok(done.rows_affected() > 0)
    }

    async fn products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let pattern = like_pattern(&filter.text);
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE ("));
        for (i, column) in ["name", "description", "quantity", "category"].iter().enumerate() {
            if i > 0 { qb.push(" OR "); }
            qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
        }
        if let Some(price) = filter.price_equals {
            qb.push(" OR price = ").push_bind(price);
        }
        qb.push(") AND price >= ").push_bind(filter.min_price).push(" AND price <= ").push_bind(filter.max_price);
        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }
        qb.push(" ORDER BY created_at");
        let rows = qb.build_query_as::<ProductRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn featured_products(&self, limit: usize) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at LIMIT $1"))
            .bind(limit as i64).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn categories(&self) -> StoreResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT DISTINCT category FROM products ORDER BY category").fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    async fn product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(Product::from))
    }

    async fn product_count(&self) -> StoreResult<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products").fetch_one(&self.pool).await?;
        Ok(n)
    }

    async fn insert_product(&self, p: &Product) -> StoreResult<()> {
        sqlx::query(&format!("INSERT INTO products ({PRODUCT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"))
            .bind(p.id).bind(&p.name).bind(p.price).bind(&p.description).bind(&p.category).bind(&p.quantity).bind(&p.img)
            .bind(&p.ingredients).bind(&p.how_to_use).bind(&p.benefits).bind(p.stock).bind(p.created_at)
            .execute(&self.pool).await.map_err(|e| classify(e, "product"))?;
        Ok(())
    }

    async fn update_product(&self, p: &Product) -> StoreResult<bool> {
        let done = sqlx::query("UPDATE products SET name = $2, price = $3, description = $4, category = $5, quantity = $6, img = $7, \
                                ingredients = $8, how_to_use = $9, benefits = $10, stock = $11 WHERE id = $1")
            .bind(p.id).bind(&p.name).bind(p.price).bind(&p.description).bind(&p.category).bind(&p.quantity).bind(&p.img)
            .bind(&p.ingredients).bind(&p.how_to_use).bind(&p.benefits).bind(p.stock)
            .execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
        let done = sqlx::query("DELETE FROM products WHERE id = $1").bind(id).execute(&self.pool).await.map_err(|e| classify(e, "product"))?;
        Ok(done.rows_affected() > 0)
    }

    async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let s = order.shipping();
        sqlx::query(&format!("INSERT INTO orders ({ORDER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"))
            .bind(order.id()).bind(order.user_id()).bind(order.total_amount()).bind(order.status().as_str())
            .bind(order.razorpay_order_id()).bind(order.payment_id())
            .bind(&s.first_name).bind(&s.last_name).bind(&s.address).bind(&s.city).bind(&s.state).bind(&s.zip).bind(&s.phone)
            .bind(order.created_at())
            .execute(&mut *tx).await.map_err(|e| classify(e, "payment"))?;

        if !order.items().is_empty() {
            let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("INSERT INTO order_items (id, order_id, product_id, quantity, price) ");
            qb.push_values(order.items(), |mut b, item| {
                b.push_bind(item.id).push_bind(item.order_id).push_bind(item.product_id).push_bind(item.quantity).push_bind(item.price);
            });
            qb.build().execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn order(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id).fetch_optional(&self.pool).await?;
        self.one_order(row).await
    }

    async fn order_by_payment(&self, payment_id: &str) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE payment_id = $1"))
            .bind(payment_id).fetch_optional(&self.pool).await?;
        self.one_order(row).await
    }

    async fn orders_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"))
            .bind(user_id).fetch_all(&self.pool).await?;
        self.assemble(rows).await
    }

    async fn orders(&self, limit: Option<i64>) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC LIMIT $1"))
            .bind(limit).fetch_all(&self.pool).await?;
        self.assemble(rows).await
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> StoreResult<bool> {
        let done = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1").bind(id).bind(status.as_str()).execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    async fn has_paid_order_with_product(&self, user_id: Uuid, product_id: Uuid) -> StoreResult<bool> {
        let (found,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM orders o JOIN order_items oi ON oi.order_id = o.id \
             WHERE o.user_id = $1 AND o.status = 'PAID' AND oi.product_id = $2)")
            .bind(user_id).bind(product_id).fetch_one(&self.pool).await?;
        Ok(found)
    }

    async fn dashboard(&self) -> StoreResult<DashboardStats> {
        let (total_users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users").fetch_one(&self.pool).await?;
        let (total_products,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products").fetch_one(&self.pool).await?;
        let (total_orders, pending_orders, delivered_orders, total_revenue): (i64, i64, i64, Decimal) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'PENDING'), COUNT(*) FILTER (WHERE status = 'DELIVERED'), \
             COALESCE(SUM(total_amount) FILTER (WHERE status = 'PAID'), 0) FROM orders")
            .fetch_one(&self.pool).await?;
        Ok(DashboardStats { total_users, total_products, total_orders, pending_orders, delivered_orders, total_revenue })
    }

    async fn insert_review(&self, r: &Review) -> StoreResult<()> {
        sqlx::query("INSERT INTO reviews (id, user_id, product_id, rating, comment, created_at) VALUES ($1, $2, $3, $4, $5, $6)")
            .bind(r.id).bind(r.user_id).bind(r.product_id).bind(i16::from(r.rating.value())).bind(&r.comment).bind(r.created_at)
            .execute(&self.pool).await.map_err(|e| classify(e, "review"))?;
        Ok(())
    }

    async fn reviews_for_product(&self, product_id: Uuid) -> StoreResult<Vec<ReviewWithAuthor>> {
        sqlx::query_as::<_, ReviewRow>(
            "SELECT r.id, r.user_id, r.product_id, r.rating, r.comment, r.created_at, u.name AS author \
             FROM reviews r LEFT JOIN users u ON u.id = r.user_id WHERE r.product_id = $1 ORDER BY r.created_at DESC")
            .bind(product_id).fetch_all(&self.pool).await?.into_iter().map(ReviewWithAuthor::try_from).collect()
    }
}
