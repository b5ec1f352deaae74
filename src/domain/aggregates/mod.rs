//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;
pub mod review;
pub mod user;

pub use product::{Product, ProductDraft, ProductError, ProductForm};
pub use order::{GatewayPayment, Order, OrderError, OrderItem, OrderParts, OrderStatus, ProductRef, ShippingDetails};
pub use cart::{Cart, CartError, CartItem};
pub use review::{Review, ReviewError, ReviewWithAuthor};
pub use user::{Role, User};
