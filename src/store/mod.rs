//! Persistence seam.
//!
//! Handlers only talk to [`Store`]. [`PgStore`] is the production backend;
//! [`MemoryStore`] backs tests and database-less development runs.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::aggregates::{Order, OrderStatus, Product, Review, ReviewWithAuthor, Role, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate {0}")]
    Duplicate(&'static str),
    #[error("{0} is still referenced")]
    InUse(&'static str),
    #[error("corrupt row: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_products: i64,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub delivered_orders: i64,
    /// Sum of the totals of PAID orders.
    pub total_revenue: Decimal,
}

const DEFAULT_MIN_PRICE: i64 = 0;
const DEFAULT_MAX_PRICE: i64 = 10_000;

/// Raw catalog search parameters, as they appear in the query string.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

/// Catalog search: free text over name, description, pack size and
/// category (or exact price when the text is numeric), a price band, and
/// an optional exact category.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductFilter {
    pub text: String,
    pub price_equals: Option<Decimal>,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub category: Option<String>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            text: String::new(),
            price_equals: None,
            min_price: Decimal::from(DEFAULT_MIN_PRICE),
            max_price: Decimal::from(DEFAULT_MAX_PRICE),
            category: None,
        }
    }
}

/// Unparsable or zero bounds fall back to the default band.
fn price_bound(raw: Option<&str>, default: i64) -> Decimal {
    raw.and_then(|s| s.trim().parse::<Decimal>().ok())
        .filter(|d| !d.is_zero())
        .unwrap_or_else(|| Decimal::from(default))
}

impl From<ProductQuery> for ProductFilter {
    fn from(q: ProductQuery) -> Self {
        let text = q.q.unwrap_or_default();
        let trimmed = text.trim();
        let price_equals = if trimmed.is_empty() { None } else { trimmed.parse::<Decimal>().ok() };
        Self {
            price_equals,
            min_price: price_bound(q.min.as_deref(), DEFAULT_MIN_PRICE),
            max_price: price_bound(q.max.as_deref(), DEFAULT_MAX_PRICE),
            category: q.category.filter(|c| !c.is_empty() && c != "All"),
            text,
        }
    }
}

impl ProductFilter {
    /// Everything, regardless of price.
    pub fn all() -> Self {
        Self { min_price: Decimal::MIN, max_price: Decimal::MAX, ..Self::default() }
    }

    pub fn matches(&self, p: &Product) -> bool {
        let needle = self.text.to_lowercase();
        let text_hit = [&p.name, &p.description, &p.quantity, &p.category]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
            || self.price_equals.is_some_and(|price| price == p.price);
        let in_band = p.price >= self.min_price && p.price <= self.max_price;
        let in_category = self.category.as_ref().map_or(true, |c| *c == p.category);
        text_hit && in_band && in_category
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    // Users
    async fn insert_user(&self, user: &User) -> StoreResult<()>;
    async fn user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Newest first.
    async fn users(&self) -> StoreResult<Vec<User>>;
    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<bool>;
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;

    // Catalog
    /// Matching products in creation order.
    async fn products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>>;
    async fn featured_products(&self, limit: usize) -> StoreResult<Vec<Product>>;
    /// Distinct, sorted.
    async fn categories(&self) -> StoreResult<Vec<String>>;
    async fn product(&self, id: Uuid) -> StoreResult<Option<Product>>;
    async fn product_count(&self) -> StoreResult<i64>;
    async fn insert_product(&self, product: &Product) -> StoreResult<()>;
    async fn update_product(&self, product: &Product) -> StoreResult<bool>;
    async fn delete_product(&self, id: Uuid) -> StoreResult<bool>;

    // Orders
    /// Writes the order and all of its items atomically.
    async fn insert_order(&self, order: &Order) -> StoreResult<()>;
    async fn order(&self, id: Uuid) -> StoreResult<Option<Order>>;
    async fn order_by_payment(&self, payment_id: &str) -> StoreResult<Option<Order>>;
    /// Newest first, items carrying product display data.
    async fn orders_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>>;
    /// Newest first.
    async fn orders(&self, limit: Option<i64>) -> StoreResult<Vec<Order>>;
    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> StoreResult<bool>;
    async fn has_paid_order_with_product(&self, user_id: Uuid, product_id: Uuid) -> StoreResult<bool>;
    async fn dashboard(&self) -> StoreResult<DashboardStats>;

    // Reviews
    async fn insert_review(&self, review: &Review) -> StoreResult<()>;
    async fn reviews_for_product(&self, product_id: Uuid) -> StoreResult<Vec<ReviewWithAuthor>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_catalog;

    fn query(q: &str, category: Option<&str>, min: Option<&str>, max: Option<&str>) -> ProductFilter {
        ProductQuery { q: Some(q.into()), category: category.map(Into::into), min: min.map(Into::into), max: max.map(Into::into) }.into()
    }

    fn names(filter: &ProductFilter) -> Vec<String> {
        demo_catalog().into_iter().filter(|p| filter.matches(p)).map(|p| p.name).collect()
    }

    #[test]
    fn test_empty_query_matches_everything_in_band() {
        assert_eq!(names(&ProductFilter::default()).len(), demo_catalog().len());
        assert_eq!(names(&query("", None, Some("300"), None)), vec!["Kesh Ratn Hair Oil", "Power Churan"]);
    }

    #[test]
    fn test_text_search_is_case_insensitive_across_fields() {
        assert_eq!(names(&query("daant", None, None, None)), vec!["Daant Manjan"]);
        assert_eq!(names(&query("60ML", None, None, None)), vec!["Jodo Ka Tail", "Rambaan Tail"]);
        assert_eq!(names(&query("oral care", None, None, None)), vec!["Daant Manjan"]);
    }

    #[test]
    fn test_numeric_query_matches_price() {
        assert_eq!(names(&query("90", None, None, None)), vec!["Daant Manjan"]);
        assert_eq!(names(&query("210", None, None, None)), vec!["Sandhivatsal Churna"]);
    }

    #[test]
    fn test_category_and_defaults() {
        let f = query("", Some("All"), Some("abc"), Some("0"));
        assert_eq!(f.category, None);
        assert_eq!(f.min_price, Decimal::ZERO);
        assert_eq!(f.max_price, Decimal::from(10_000));
        assert_eq!(names(&query("", Some("Pain Relief"), None, None)), vec!["Jodo Ka Tail", "Sandhivatsal Churna"]);
    }
}
