//! Grocer Core - Shared types and catalog logic.
//!
//! This crate provides the types used across all Grocer components:
//! - `storefront` - HTTP service holding the catalog and the cart
//! - `client` - Typed API client and cart synchronizer
//! - `cli` - Command-line shopping tool
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no global state. The catalog query engine lives here because both
//! the server and the clients derive views from a product list.
//!
//! # Modules
//!
//! - [`types`] - Product records, identifiers, prices and cart lines
//! - [`query`] - Filter, sort and paginate a catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod query;
pub mod types;

pub use query::{Browser, CatalogQuery, CatalogView, PAGE_SIZE, SortKey};
pub use types::*;
