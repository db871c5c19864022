//! Client for the Grocer storefront API.
//!
//! - [`api`] - typed REST client over `reqwest`
//! - [`cart_sync`] - local cart snapshot that refetches after every mutation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart_sync;
pub mod error;

pub use api::{DEFAULT_API_URL, StorefrontApi};
pub use cart_sync::{CartBackend, CartSynchronizer, ClearSummary, SyncOutcome};
pub use error::ClientError;
