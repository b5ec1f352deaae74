//! Cart Aggregate
//!
//! The shopper's cart is kept by the client; the server rebuilds it from the
//! checkout payload to validate lines and compute the total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::value_objects::{fits_minor_unit, Money, MoneyError, Quantity};

#[derive(Clone, Debug)]
pub struct Cart {
    items: Vec<CartItem>,
    currency: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "id")]
    pub product_id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    pub price: Decimal,
    pub quantity: i64,
}

impl CartItem {
    pub fn unit_price(&self, currency: &str) -> Money { Money::new(self.price, currency) }
    pub fn line_total(&self, currency: &str) -> Result<Money, MoneyError> {
        let quantity = u32::try_from(self.quantity).map_err(|_| MoneyError::Overflow)?;
        self.unit_price(currency).multiply(quantity)
    }
}

impl Cart {
    pub fn new(currency: &str) -> Self {
        Self { items: vec![], currency: currency.to_string() }
    }

    /// Rebuilds a cart from client-supplied lines, merging repeated products.
    pub fn from_lines(lines: Vec<CartItem>, currency: &str) -> Result<Self, CartError> {
        let mut cart = Self::new(currency);
        for line in lines { cart.add_item(line)?; }
        if cart.is_empty() { return Err(CartError::Empty); }
        cart.total()?;
        Ok(cart)
    }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn add_item(&mut self, item: CartItem) -> Result<(), CartError> {
        let qty = Quantity::new(item.quantity).ok_or(CartError::InvalidQuantity(item.quantity))?;
        if item.price.is_sign_negative() { return Err(CartError::NegativePrice(item.product_id)); }
        if !fits_minor_unit(item.price) { return Err(CartError::PriceTooPrecise(item.product_id)); }
        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == item.product_id) {
            if existing.price != item.price { return Err(CartError::PriceConflict(item.product_id)); }
            existing.quantity = existing.quantity.saturating_add(i64::from(qty.value())).min(i64::from(u32::MAX));
        } else {
            self.items.push(item);
        }
        Ok(())
    }

    pub fn update_quantity(&mut self, product_id: Uuid, quantity: i64) -> Result<(), CartError> {
        Quantity::new(quantity).ok_or(CartError::InvalidQuantity(quantity))?;
        let item = self.items.iter_mut().find(|i| i.product_id == product_id).ok_or(CartError::ItemNotFound)?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: Uuid) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before { return Err(CartError::ItemNotFound); }
        Ok(())
    }

    pub fn clear(&mut self) { self.items.clear(); }

    pub fn total(&self) -> Result<Money, CartError> {
        self.items.iter().try_fold(Money::zero(&self.currency), |acc, i| {
            acc.add(&i.line_total(&self.currency)?).map_err(CartError::from)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("Cart is empty")]
    Empty,
    #[error("Item not found")]
    ItemNotFound,
    #[error("Invalid quantity {0}")]
    InvalidQuantity(i64),
    #[error("Negative price for product {0}")]
    NegativePrice(Uuid),
    #[error("Conflicting prices for product {0}")]
    PriceConflict(Uuid),
    #[error("Price of product {0} has more than two decimals")]
    PriceTooPrecise(Uuid),
    #[error("Cart total out of range")]
    TotalOutOfRange,
}

impl From<MoneyError> for CartError {
    fn from(_: MoneyError) -> Self { Self::TotalOutOfRange }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: Uuid, price: i64, quantity: i64) -> CartItem {
        CartItem { product_id: id, name: Some("Face Pack".into()), price: Decimal::new(price, 0), quantity }
    }

    #[test]
    fn test_cart_operations() {
        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();
        let mut cart = Cart::new("INR");
        cart.add_item(line(p1, 160, 2)).unwrap();
        cart.add_item(line(p1, 160, 1)).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 3); // Merged
        cart.add_item(line(p2, 90, 1)).unwrap();
        assert_eq!(cart.total().unwrap().amount(), Decimal::new(570, 0));
        cart.update_quantity(p2, 2).unwrap();
        assert_eq!(cart.update_quantity(p2, 0), Err(CartError::InvalidQuantity(0)));
        assert_eq!(cart.total().unwrap().amount(), Decimal::new(660, 0));
        cart.remove_item(p1).unwrap();
        assert_eq!(cart.remove_item(p1), Err(CartError::ItemNotFound));
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_lines_rejects_bad_input() {
        let id = Uuid::new_v4();
        assert_eq!(Cart::from_lines(vec![], "INR").unwrap_err(), CartError::Empty);
        assert_eq!(Cart::from_lines(vec![line(id, 10, 0)], "INR").unwrap_err(), CartError::InvalidQuantity(0));
        assert_eq!(Cart::from_lines(vec![line(id, -10, 1)], "INR").unwrap_err(), CartError::NegativePrice(id));
        assert_eq!(Cart::from_lines(vec![line(id, 10, 1), line(id, 12, 1)], "INR").unwrap_err(), CartError::PriceConflict(id));
        let precise = CartItem { price: Decimal::new(19995, 3), ..line(id, 0, 1) };
        assert_eq!(Cart::from_lines(vec![precise], "INR").unwrap_err(), CartError::PriceTooPrecise(id));
    }

    #[test]
    fn test_oversized_line_total() {
        let id = Uuid::new_v4();
        let huge = CartItem { price: Decimal::MAX, ..line(id, 0, 3) };
        assert_eq!(Cart::from_lines(vec![huge], "INR").unwrap_err(), CartError::TotalOutOfRange);
        let mut cart = Cart::new("INR");
        cart.add_item(line(id, 10, 1)).unwrap();
        cart.add_item(line(Uuid::new_v4(), 20, 2)).unwrap();
        assert_eq!(cart.total().unwrap().amount(), Decimal::new(50, 0));
    }
}
