use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{DashboardStats, ProductFilter, Store, StoreError, StoreResult};
use crate::domain::aggregates::{Order, OrderStatus, Product, ProductRef, Review, ReviewWithAuthor, Role, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    products: Vec<Product>,
    orders: Vec<Order>,
    reviews: Vec<Review>,
}

/// In-process store with the same constraints the SQL schema enforces.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

impl Tables {
    fn with_refs(&self, order: &Order) -> Order {
        order.clone().with_product_refs(|id| {
            self.products.iter().find(|p| p.id == id).map(|p| ProductRef { name: p.name.clone(), img: p.img.clone() })
        })
    }

    fn newest_orders(&self) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.iter().collect();
        orders.sort_by_key(|o| std::cmp::Reverse(o.created_at()));
        orders
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut t = self.tables.write();
        if t.users.iter().any(|u| u.email == user.email) { return Err(StoreError::Duplicate("email")); }
        t.users.push(user.clone());
        Ok(())
    }

    async fn user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.tables.read().users.iter().find(|u| u.email == email).cloned())
    }

    async fn users(&self) -> StoreResult<Vec<User>> {
        let mut users = self.tables.read().users.clone();
        users.sort_by_key(|u| std::cmp::Reverse(u.created_at));
        Ok(users)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<bool> {
        let mut t = self.tables.write();
        Ok(t.users.iter_mut().find(|u| u.id == id).map(|u| u.role = role).is_some())
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.tables.write();
        if t.orders.iter().any(|o| o.user_id() == id) { return Err(StoreError::InUse("user")); }
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        t.reviews.retain(|r| r.user_id != id);
        Ok(t.users.len() != before)
    }

    async fn products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let mut products: Vec<Product> = self.tables.read().products.iter().filter(|p| filter.matches(p)).cloned().collect();
        products.sort_by_key(|p| p.created_at);
        Ok(products)
    }

    async fn featured_products(&self, limit: usize) -> StoreResult<Vec<Product>> {
        let mut products = self.tables.read().products.clone();
        products.sort_by_key(|p| p.created_at);
        products.truncate(limit);
        Ok(products)
    }

    async fn categories(&self) -> StoreResult<Vec<String>> {
        let mut categories: Vec<String> = self.tables.read().products.iter().map(|p| p.category.clone()).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Ok(self.tables.read().products.iter().find(|p| p.id == id).cloned())
    }

    async fn product_count(&self) -> StoreResult<i64> {
        Ok(self.tables.read().products.len() as i64)
    }

    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        let mut t = self.tables.write();
        if t.products.iter().any(|p| p.id == product.id) { return Err(StoreError::Duplicate("product")); }
        t.products.push(product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> StoreResult<bool> {
        let mut t = self.tables.write();
        Ok(t.products.iter_mut().find(|p| p.id == product.id).map(|p| *p = product.clone()).is_some())
    }

    async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.tables.write();
        if t.orders.iter().any(|o| o.contains_product(id)) { return Err(StoreError::InUse("product")); }
        let before = t.products.len();
        t.products.retain(|p| p.id != id);
        t.reviews.retain(|r| r.product_id != id);
        Ok(t.products.len() != before)
    }

    async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        let mut t = self.tables.write();
        if !t.users.iter().any(|u| u.id == order.user_id()) { return Err(StoreError::Corrupt(format!("unknown user {}", order.user_id()))); }
        if let Some(payment) = order.payment_id() {
            if t.orders.iter().any(|o| o.payment_id() == Some(payment)) { return Err(StoreError::Duplicate("payment")); }
        }
        if let Some(missing) = order.items().iter().find(|i| !t.products.iter().any(|p| p.id == i.product_id)) {
            return Err(StoreError::Corrupt(format!("unknown product {}", missing.product_id)));
        }
        t.orders.push(order.clone());
        Ok(())
    }

    async fn order(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let t = self.tables.read();
        Ok(t.orders.iter().find(|o| o.id() == id).map(|o| t.with_refs(o)))
    }

    async fn order_by_payment(&self, payment_id: &str) -> StoreResult<Option<Order>> {
        let t = self.tables.read();
        Ok(t.orders.iter().find(|o| o.payment_id() == Some(payment_id)).map(|o| t.with_refs(o)))
    }

    async fn orders_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
        let t = self.tables.read();
        Ok(t.newest_orders().into_iter().filter(|o| o.user_id() == user_id).map(|o| t.with_refs(o)).collect())
    }

    async fn orders(&self, limit: Option<i64>) -> StoreResult<Vec<Order>> {
        let t = self.tables.read();
        let limit = limit.map_or(usize::MAX, |l| l.max(0) as usize);
        Ok(t.newest_orders().into_iter().take(limit).map(|o| t.with_refs(o)).collect())
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> StoreResult<bool> {
        let mut t = self.tables.write();
        Ok(t.orders.iter_mut().find(|o| o.id() == id).map(|o| { o.set_status(status); o.take_events(); }).is_some())
    }

    async fn has_paid_order_with_product(&self, user_id: Uuid, product_id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.read().orders.iter().any(|o| o.user_id() == user_id && o.is_paid() && o.contains_product(product_id)))
    }

    async fn dashboard(&self) -> StoreResult<DashboardStats> {
        let t = self.tables.read();
        let count = |status: OrderStatus| t.orders.iter().filter(|o| o.status() == status).count() as i64;
        Ok(DashboardStats {
            total_users: t.users.len() as i64,
            total_products: t.products.len() as i64,
            total_orders: t.orders.len() as i64,
            pending_orders: count(OrderStatus::Pending),
            delivered_orders: count(OrderStatus::Delivered),
            total_revenue: t.orders.iter().filter(|o| o.is_paid()).map(|o| o.total_amount()).sum::<Decimal>(),
        })
    }

    async fn insert_review(&self, review: &Review) -> StoreResult<()> {
        self.tables.write().reviews.push(review.clone());
        Ok(())
    }

    async fn reviews_for_product(&self, product_id: Uuid) -> StoreResult<Vec<ReviewWithAuthor>> {
        let t = self.tables.read();
        Ok(t.reviews.iter().filter(|r| r.product_id == product_id).map(|r| ReviewWithAuthor {
            review: r.clone(),
            author: t.users.iter().find(|u| u.id == r.user_id).and_then(|u| u.name.clone()),
        }).collect())
    }
}
