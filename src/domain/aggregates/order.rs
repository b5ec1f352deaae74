//! Order Aggregate

use std::str::FromStr;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use crate::domain::aggregates::cart::Cart;
use crate::domain::events::{DomainEvent, OrderEvent};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus { #[default] Pending, Paid, Shipped, Delivered }

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [Self::Pending, Self::Paid, Self::Shipped, Self::Delivered];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|st| st.as_str() == s).ok_or_else(|| OrderError::UnknownStatus(s.to_string()))
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Shipping address captured with the order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[validate(length(min = 1, message = "Zip is required"))]
    pub zip: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
}

/// Display data of the purchased product, joined on read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductRef { pub name: String, pub img: String }

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Unit price at purchase time.
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductRef>,
}

/// Identifiers the gateway hands back after a successful payment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayPayment { pub order_id: String, pub payment_id: String }

/// Stored state of an order, used to rebuild the aggregate.
#[derive(Clone, Debug)]
pub struct OrderParts {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub razorpay_order_id: Option<String>,
    pub payment_id: Option<String>,
    pub shipping: ShippingDetails,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: Uuid,
    user_id: Uuid,
    total_amount: Decimal,
    status: OrderStatus,
    razorpay_order_id: Option<String>,
    payment_id: Option<String>,
    #[serde(flatten)]
    shipping: ShippingDetails,
    items: Vec<OrderItem>,
    created_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

impl Order {
    /// Builds a paid order from a verified payment and the validated cart.
    pub fn settle(user_id: Uuid, payment: GatewayPayment, shipping: ShippingDetails, cart: &Cart) -> Result<Self, OrderError> {
        if cart.is_empty() { return Err(OrderError::NoItems); }
        let id = Uuid::now_v7();
        let items = cart.items().iter().map(|line| {
            let quantity = i32::try_from(line.quantity).map_err(|_| OrderError::InvalidQuantity(line.quantity))?;
            Ok(OrderItem { id: Uuid::now_v7(), order_id: id, product_id: line.product_id, quantity, price: line.price, product: None })
        }).collect::<Result<Vec<_>, OrderError>>()?;
        let total = cart.total().map_err(|_| OrderError::TotalOutOfRange)?.amount();
        let mut order = Self {
            id, user_id, total_amount: total, status: OrderStatus::Paid,
            razorpay_order_id: Some(payment.order_id.clone()), payment_id: Some(payment.payment_id),
            shipping, items, created_at: Utc::now(), events: vec![],
        };
        order.raise_event(DomainEvent::Order(OrderEvent::Settled { order_id: id, user_id, gateway_order_id: payment.order_id, total }));
        Ok(order)
    }

    pub fn restore(parts: OrderParts) -> Self {
        Self {
            id: parts.id, user_id: parts.user_id, total_amount: parts.total_amount, status: parts.status,
            razorpay_order_id: parts.razorpay_order_id, payment_id: parts.payment_id,
            shipping: parts.shipping, items: parts.items, created_at: parts.created_at, events: vec![],
        }
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn user_id(&self) -> Uuid { self.user_id }
    pub fn status(&self) -> OrderStatus { self.status }
    pub fn total_amount(&self) -> Decimal { self.total_amount }
    pub fn razorpay_order_id(&self) -> Option<&str> { self.razorpay_order_id.as_deref() }
    pub fn payment_id(&self) -> Option<&str> { self.payment_id.as_deref() }
    pub fn shipping(&self) -> &ShippingDetails { &self.shipping }
    pub fn items(&self) -> &[OrderItem] { &self.items }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn is_paid(&self) -> bool { self.status == OrderStatus::Paid }

    pub fn contains_product(&self, product_id: Uuid) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Attaches display data to the items without changing what was bought.
    pub fn with_product_refs(mut self, lookup: impl Fn(Uuid) -> Option<ProductRef>) -> Self {
        for item in &mut self.items { item.product = lookup(item.product_id); }
        self
    }

    /// Back-office status change. Returns false when the status was already set.
    pub fn set_status(&mut self, status: OrderStatus) -> bool {
        if self.status == status { return false; }
        let from = self.status;
        self.status = status;
        self.raise_event(DomainEvent::Order(OrderEvent::StatusChanged { order_id: self.id, from, to: status }));
        true
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("No items")]
    NoItems,
    #[error("Invalid quantity {0}")]
    InvalidQuantity(i64),
    #[error("Unknown order status {0:?}")]
    UnknownStatus(String),
    #[error("Order total out of range")]
    TotalOutOfRange,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::cart::CartItem;

    fn cart() -> (Uuid, Cart) {
        let product = Uuid::new_v4();
        let cart = Cart::from_lines(vec![CartItem { product_id: product, name: None, price: Decimal::new(180, 0), quantity: 2 }], "INR").unwrap();
        (product, cart)
    }

    fn payment() -> GatewayPayment { GatewayPayment { order_id: "order_1".into(), payment_id: "pay_1".into() } }

    #[test]
    fn test_order_workflow() {
        let (product, cart) = cart();
        let user = Uuid::new_v4();
        let mut order = Order::settle(user, payment(), ShippingDetails::default(), &cart).unwrap();
        assert!(order.is_paid());
        assert_eq!(order.total_amount(), Decimal::new(360, 0));
        assert!(order.contains_product(product));
        assert_eq!(order.items()[0].order_id, order.id());
        let events = order.take_events();
        assert!(matches!(&events[..], [DomainEvent::Order(OrderEvent::Settled { user_id, .. })] if *user_id == user));

        assert!(order.set_status(OrderStatus::Shipped));
        assert!(!order.set_status(OrderStatus::Shipped));
        assert_eq!(order.take_events().len(), 1);
        assert_eq!(order.status(), OrderStatus::Shipped);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("DELIVERED".parse::<OrderStatus>(), Ok(OrderStatus::Delivered));
        assert_eq!("paid".parse::<OrderStatus>(), Err(OrderError::UnknownStatus("paid".into())));
        assert_eq!(serde_json::to_string(&OrderStatus::Paid).unwrap(), "\"PAID\"");
    }

    #[test]
    fn test_serialized_shape() {
        let (_, cart) = cart();
        let order = Order::settle(Uuid::new_v4(), payment(), ShippingDetails { city: "Pune".into(), ..Default::default() }, &cart).unwrap();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "PAID");
        assert_eq!(json["city"], "Pune");
        assert_eq!(json["razorpayOrderId"], "order_1");
        assert!(json.get("events").is_none());
    }
}
