//! Core types for Grocer.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{CartItem, CartLineRequest, StatusResponse, cart_count, cart_total};
pub use id::{IdError, ProductId};
pub use price::{CurrencyCode, Price, discount_fraction, parse_amount};
pub use product::{NewProduct, Product};
