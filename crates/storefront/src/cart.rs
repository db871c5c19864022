//! Server-side cart store.
//!
//! The store is the single source of truth for quantities. It only records
//! product ids; product data is joined from the catalog whenever the cart is
//! read, so clients always see current catalog records.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use grocer_core::{CartItem, ProductId};
use thiserror::Error;
use tracing::warn;

use crate::catalog::CatalogStore;

/// Cart rule violations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantities must be at least one; removal is a separate operation.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    /// The product id is blank.
    #[error("product id is missing")]
    InvalidProductId,

    /// No line exists for this product.
    #[error("no cart line for product {0}")]
    LineNotFound(ProductId),

    /// Adding would overflow the line's quantity.
    #[error("quantity overflow for product {0}")]
    QuantityOverflow(ProductId),
}

/// One stored line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// The cart resource.
///
/// Lines keep the order in which products were first added.
#[derive(Clone, Default)]
pub struct CartStore {
    lines: Arc<RwLock<Vec<CartEntry>>>,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lines.
    #[must_use]
    pub fn lines(&self) -> Vec<CartEntry> {
        self.read().clone()
    }

    /// Current lines joined with catalog products.
    ///
    /// Lines whose product is no longer in the catalog are left out.
    #[must_use]
    pub fn items(&self, catalog: &CatalogStore) -> Vec<CartItem> {
        self.read()
            .iter()
            .filter_map(|entry| {
                let Some(product) = catalog.get(entry.product_id.as_str()) else {
                    warn!(product_id = %entry.product_id, "Cart line references unknown product");
                    return None;
                };
                Some(CartItem {
                    product,
                    quantity: entry.quantity,
                })
            })
            .collect()
    }

    /// Increase a line by `quantity`, creating it if absent.
    ///
    /// # Errors
    ///
    /// Fails for a blank id, a zero quantity, or an overflowing total.
    pub fn add(&self, product_id: &ProductId, quantity: u32) -> Result<u32, CartError> {
        validate(product_id, quantity)?;

        let mut lines = self.write();
        if let Some(entry) = lines.iter_mut().find(|e| &e.product_id == product_id) {
            entry.quantity = entry
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| CartError::QuantityOverflow(product_id.clone()))?;
            return Ok(entry.quantity);
        }

        lines.push(CartEntry {
            product_id: product_id.clone(),
            quantity,
        });
        Ok(quantity)
    }

    /// Set a line's quantity to exactly `quantity`.
    ///
    /// # Errors
    ///
    /// Fails for a blank id, a zero quantity, or a product not in the cart.
    pub fn set_quantity(&self, product_id: &ProductId, quantity: u32) -> Result<(), CartError> {
        validate(product_id, quantity)?;

        let mut lines = self.write();
        let entry = lines
            .iter_mut()
            .find(|e| &e.product_id == product_id)
            .ok_or_else(|| CartError::LineNotFound(product_id.clone()))?;
        entry.quantity = quantity;
        Ok(())
    }

    /// Delete a line. Returns whether a line was removed.
    pub fn remove(&self, product_id: &str) -> bool {
        let mut lines = self.write();
        let before = lines.len();
        lines.retain(|e| e.product_id.as_str() != product_id);
        lines.len() != before
    }

    /// Sum of quantities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.read().iter().map(|e| u64::from(e.quantity)).sum()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<CartEntry>> {
        self.lines.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<CartEntry>> {
        self.lines.write().unwrap_or_else(PoisonError::into_inner)
    }
}

const fn validate_quantity(quantity: u32) -> Result<(), CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity(quantity));
    }
    Ok(())
}

/// Reject blank product ids and zero quantities.
pub(crate) fn validate(product_id: &ProductId, quantity: u32) -> Result<(), CartError> {
    if !product_id.is_valid() {
        return Err(CartError::InvalidProductId);
    }
    validate_quantity(quantity)
}
