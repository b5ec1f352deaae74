//! Product Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use crate::domain::events::{DomainEvent, ProductEvent};
use crate::domain::value_objects::fits_minor_unit;

/// A catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub category: String,
    /// Pack size label such as "100gm" or "60ml".
    pub quantity: String,
    pub img: String,
    pub ingredients: Option<String>,
    pub how_to_use: Option<String>,
    pub benefits: Vec<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

/// Admin product form as submitted by the back-office.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub img: String,
    pub ingredients: Option<String>,
    pub how_to_use: Option<String>,
    pub stock: Option<i32>,
    /// Comma-separated list.
    #[serde(default)]
    pub benefits: String,
}

/// Validated field set used both for creating and updating a product.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub category: String,
    pub quantity: String,
    pub img: String,
    pub ingredients: Option<String>,
    pub how_to_use: Option<String>,
    pub benefits: Vec<String>,
    pub stock: i32,
}

impl TryFrom<ProductForm> for ProductDraft {
    type Error = ProductError;

    fn try_from(form: ProductForm) -> Result<Self, Self::Error> {
        form.validate().map_err(|_| ProductError::MissingName)?;
        if form.name.trim().is_empty() { return Err(ProductError::MissingName); }
        if form.price.is_sign_negative() { return Err(ProductError::NegativePrice); }
        if !fits_minor_unit(form.price) { return Err(ProductError::PriceTooPrecise); }
        let stock = form.stock.unwrap_or(0);
        if stock < 0 { return Err(ProductError::NegativeStock); }
        Ok(Self {
            name: form.name.trim().to_string(),
            price: form.price,
            description: form.description,
            category: form.category.trim().to_string(),
            quantity: form.quantity,
            img: form.img,
            ingredients: form.ingredients.filter(|s| !s.trim().is_empty()),
            how_to_use: form.how_to_use.filter(|s| !s.trim().is_empty()),
            benefits: split_benefits(&form.benefits),
            stock,
        })
    }
}

pub fn split_benefits(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|b| !b.is_empty()).map(String::from).collect()
}

impl Product {
    pub fn create(draft: ProductDraft) -> (Self, DomainEvent) {
        let id = Uuid::now_v7();
        let event = DomainEvent::Product(ProductEvent::Created { product_id: id, name: draft.name.clone() });
        let product = Self {
            id, name: draft.name, price: draft.price, description: draft.description,
            category: draft.category, quantity: draft.quantity, img: draft.img,
            ingredients: draft.ingredients, how_to_use: draft.how_to_use,
            benefits: draft.benefits, stock: draft.stock, created_at: Utc::now(),
        };
        (product, event)
    }

    pub fn apply(&mut self, draft: ProductDraft) -> DomainEvent {
        self.name = draft.name;
        self.price = draft.price;
        self.description = draft.description;
        self.category = draft.category;
        self.quantity = draft.quantity;
        self.img = draft.img;
        self.ingredients = draft.ingredients;
        self.how_to_use = draft.how_to_use;
        self.benefits = draft.benefits;
        self.stock = draft.stock;
        DomainEvent::Product(ProductEvent::Updated { product_id: self.id })
    }

    pub fn is_in_stock(&self) -> bool { self.stock > 0 }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductError {
    #[error("Name is required")]
    MissingName,
    #[error("Price cannot be negative")]
    NegativePrice,
    #[error("Stock cannot be negative")]
    NegativeStock,
    #[error("Price cannot have more than two decimals")]
    PriceTooPrecise,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: " Daant Manjan ".into(), price: Decimal::new(90, 0), category: "Oral Care".into(),
            quantity: "50gm".into(), benefits: "Strengthens gums., , Fights bad breath. ,".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_benefits_are_split_and_trimmed() {
        let draft = ProductDraft::try_from(form()).unwrap();
        assert_eq!(draft.name, "Daant Manjan");
        assert_eq!(draft.benefits, vec!["Strengthens gums.", "Fights bad breath."]);
        assert_eq!(draft.stock, 0);
        assert!(split_benefits("").is_empty());
    }

    #[test]
    fn test_form_rejections() {
        assert_eq!(ProductDraft::try_from(ProductForm { name: "  ".into(), ..form() }), Err(ProductError::MissingName));
        assert_eq!(ProductDraft::try_from(ProductForm { price: Decimal::new(-1, 0), ..form() }), Err(ProductError::NegativePrice));
        assert_eq!(ProductDraft::try_from(ProductForm { stock: Some(-3), ..form() }), Err(ProductError::NegativeStock));
        assert_eq!(ProductDraft::try_from(ProductForm { price: Decimal::new(90005, 3), ..form() }), Err(ProductError::PriceTooPrecise));
        assert!(ProductDraft::try_from(ProductForm { price: Decimal::new(89990, 3), ..form() }).is_ok());
    }

    #[test]
    fn test_create_and_update() {
        let (mut p, event) = Product::create(ProductDraft::try_from(form()).unwrap());
        assert!(matches!(event, DomainEvent::Product(ProductEvent::Created { product_id, .. }) if product_id == p.id));
        assert!(!p.is_in_stock());
        p.apply(ProductDraft::try_from(ProductForm { stock: Some(12), ..form() }).unwrap());
        assert!(p.is_in_stock());
    }
}
