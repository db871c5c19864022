//! Product identifiers.
//!
//! Catalog ids are strings on the wire (`"1"`, `"2"`, ...) because that is what
//! the cart resource and the clients exchange. The newtype keeps them from being
//! mixed up with the other free-text fields of a product.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string cannot be used as a product id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("product id is empty")]
    Empty,
}

/// Identifier of a catalog product.
///
/// A default (empty) id is representable so that records missing their `_id`
/// can still be decoded and then rejected by [`ProductId::is_valid`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap an id string without validation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the id assigned to the `n`th product of a catalog.
    #[must_use]
    pub fn from_sequence(n: u64) -> Self {
        Self(n.to_string())
    }

    /// Parse a user-supplied id, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Empty`] if nothing is left after trimming.
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Whether this id can address a product.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }

    /// Get the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
