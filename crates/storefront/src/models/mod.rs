//! Domain models for the storefront.
//!
//! Domain types are separate from both database rows and JSON bodies; the
//! `*View` types are what handlers serialize.

pub mod cart;
pub mod customer;
pub mod product;

pub use cart::{AddOutcome, Cart, CartItem, CartItemView, CartListing, CartView};
pub use customer::{Customer, CustomerView, NewCustomer};
pub use product::{NewProduct, Product, ProductFilter};
