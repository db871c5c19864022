//! Client-side cart kept in sync with the server cart.
//!
//! The server owns the cart. Every mutation is sent to the server and then
//! the whole cart is fetched again, so the local snapshot is always the last
//! server answer and never a locally patched copy.
//!
//! Mutations take `&mut self`; a mutation and its refetch therefore finish
//! before the next mutation on the same synchronizer starts. Share one
//! synchronizer across tasks behind a `tokio::sync::Mutex`.
//!
//! ```rust,ignore
//! let api = StorefrontApi::new("http://127.0.0.1:8000/api")?;
//! let mut cart = CartSynchronizer::new(api);
//! cart.refresh().await?;
//! cart.add(&product, 2).await?;
//! println!("{} items, total {:?}", cart.count(), cart.total());
//! ```

use std::future::Future;

use futures::future::join_all;
use grocer_core::{CartItem, CartLineRequest, Product, ProductId, cart_count, cart_total};
use rust_decimal::Decimal;
use tracing::{instrument, warn};

use crate::api::StorefrontApi;
use crate::error::ClientError;

/// Server operations the synchronizer needs.
pub trait CartBackend: Send + Sync {
    /// Fetch the full cart.
    fn fetch_cart(&self) -> impl Future<Output = Result<Vec<CartItem>, ClientError>> + Send;

    /// Increase a line, creating it if absent.
    fn add_line(
        &self,
        line: &CartLineRequest,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Set a line's quantity.
    fn set_line(
        &self,
        line: &CartLineRequest,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Delete a line.
    fn delete_line(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

impl CartBackend for StorefrontApi {
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, ClientError> {
        self.cart().await
    }

    async fn add_line(&self, line: &CartLineRequest) -> Result<(), ClientError> {
        self.add_to_cart(line).await.map(drop)
    }

    async fn set_line(&self, line: &CartLineRequest) -> Result<(), ClientError> {
        self.update_cart(line).await.map(drop)
    }

    async fn delete_line(&self, product_id: &ProductId) -> Result<(), ClientError> {
        self.remove_from_cart(product_id).await.map(drop)
    }
}

/// Whether a mutation reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Sent and the snapshot refetched.
    Synced,
    /// Rejected locally (invalid id); nothing was sent.
    Skipped,
}

/// Result of [`CartSynchronizer::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearSummary {
    /// Remove requests sent, one per line.
    pub attempted: usize,
    /// Remove requests that failed.
    pub failed: usize,
}

/// Client-side cart view.
pub struct CartSynchronizer<B> {
    backend: B,
    items: Vec<CartItem>,
}

impl<B: CartBackend> CartSynchronizer<B> {
    /// Create a synchronizer with an empty snapshot.
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            items: Vec::new(),
        }
    }

    /// The backend this synchronizer talks to.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Last fetched cart lines.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Replace the snapshot with the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails; the snapshot is left unchanged.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.items = self.backend.fetch_cart().await?;
        Ok(())
    }

    /// Add `quantity` of `product`, then refetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the server call or the refetch fails.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add(
        &mut self,
        product: &Product,
        quantity: u32,
    ) -> Result<SyncOutcome, ClientError> {
        if !product.id.is_valid() {
            warn!(product_name = %product.product_name, "Cannot add product without an id");
            return Ok(SyncOutcome::Skipped);
        }

        let line = CartLineRequest {
            product_id: product.id.clone(),
            quantity,
        };
        self.backend.add_line(&line).await?;
        self.refresh().await?;
        Ok(SyncOutcome::Synced)
    }

    /// Set a line to exactly `quantity`, then refetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the server call or the refetch fails.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &mut self,
        product_id: &str,
        quantity: u32,
    ) -> Result<SyncOutcome, ClientError> {
        let Ok(product_id) = ProductId::parse(product_id) else {
            warn!("Cannot update cart line with an invalid product id");
            return Ok(SyncOutcome::Skipped);
        };

        let line = CartLineRequest {
            product_id,
            quantity,
        };
        self.backend.set_line(&line).await?;
        self.refresh().await?;
        Ok(SyncOutcome::Synced)
    }

    /// Delete a line, then refetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the server call or the refetch fails.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, product_id: &str) -> Result<SyncOutcome, ClientError> {
        let Ok(product_id) = ProductId::parse(product_id) else {
            warn!("Cannot remove cart line with an invalid product id");
            return Ok(SyncOutcome::Skipped);
        };

        self.backend.delete_line(&product_id).await?;
        self.refresh().await?;
        Ok(SyncOutcome::Synced)
    }

    /// Remove every line with one request each, then empty the snapshot.
    ///
    /// Failed removals are logged and counted but not retried or rolled back,
    /// so the server may keep some lines while the snapshot is empty.
    #[instrument(skip(self), fields(lines = self.items.len()))]
    pub async fn clear(&mut self) -> ClearSummary {
        let ids: Vec<ProductId> = self
            .items
            .iter()
            .map(|item| item.product.id.clone())
            .collect();

        let backend = &self.backend;
        let results = join_all(ids.iter().map(|id| backend.delete_line(id))).await;

        let mut summary = ClearSummary {
            attempted: ids.len(),
            failed: 0,
        };
        for (id, result) in ids.iter().zip(results) {
            if let Err(e) = result {
                warn!(product_id = %id, error = %e, "Failed to remove cart line during clear");
                summary.failed += 1;
            }
        }

        self.items.clear();
        summary
    }

    /// Sum of selling price times quantity.
    ///
    /// `None` if any line's selling price is not a number.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        cart_total(&self.items)
    }

    /// Sum of quantities; zero for an empty cart.
    #[must_use]
    pub fn count(&self) -> u64 {
        cart_count(&self.items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;

    fn product(id: &str, discount_price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            product_name: format!("Product {id}"),
            brand: "Brand".to_string(),
            price: "100".to_string(),
            discount_price: discount_price.to_string(),
            image_url: String::new(),
            quantity: "1 pc".to_string(),
            category: "Staples".to_string(),
            sub_category: "Rice".to_string(),
            absolute_url: String::new(),
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Fetch,
        Add(String, u32),
        Set(String, u32),
        Delete(String),
    }

    /// In-memory server cart that records every call.
    #[derive(Default)]
    struct FakeBackend {
        catalog: Vec<Product>,
        lines: Mutex<Vec<CartItem>>,
        calls: Mutex<Vec<Call>>,
        failing_deletes: HashSet<String>,
    }

    impl FakeBackend {
        fn with_catalog(catalog: Vec<Product>) -> Self {
            Self {
                catalog,
                ..Self::default()
            }
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CartBackend for FakeBackend {
        async fn fetch_cart(&self) -> Result<Vec<CartItem>, ClientError> {
            self.record(Call::Fetch);
            Ok(self.lines.lock().unwrap().clone())
        }

        async fn add_line(&self, line: &CartLineRequest) -> Result<(), ClientError> {
            self.record(Call::Add(line.product_id.to_string(), line.quantity));
            let product = self
                .catalog
                .iter()
                .find(|p| p.id == line.product_id)
                .cloned()
                .ok_or_else(|| ClientError::Api {
                    status: 404,
                    detail: "not found".to_string(),
                })?;
            let mut lines = self.lines.lock().unwrap();
            if let Some(item) = lines.iter_mut().find(|i| i.product.id == line.product_id) {
                item.quantity += line.quantity;
            } else {
                lines.push(CartItem {
                    product,
                    quantity: line.quantity,
                });
            }
            Ok(())
        }

        async fn set_line(&self, line: &CartLineRequest) -> Result<(), ClientError> {
            self.record(Call::Set(line.product_id.to_string(), line.quantity));
            let mut lines = self.lines.lock().unwrap();
            let item = lines
                .iter_mut()
                .find(|i| i.product.id == line.product_id)
                .ok_or_else(|| ClientError::Api {
                    status: 404,
                    detail: "not found".to_string(),
                })?;
            item.quantity = line.quantity;
            Ok(())
        }

        async fn delete_line(&self, product_id: &ProductId) -> Result<(), ClientError> {
            self.record(Call::Delete(product_id.to_string()));
            if self.failing_deletes.contains(product_id.as_str()) {
                return Err(ClientError::Api {
                    status: 500,
                    detail: "Internal server error".to_string(),
                });
            }
            self.lines
                .lock()
                .unwrap()
                .retain(|i| &i.product.id != product_id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_add_then_refetch_computes_total_and_count() {
        let seven = product("7", "50");
        let mut cart = CartSynchronizer::new(FakeBackend::with_catalog(vec![seven.clone()]));

        let outcome = cart.add(&seven, 2).await.unwrap();

        assert_eq!(outcome, SyncOutcome::Synced);
        assert_eq!(cart.total(), Some(Decimal::from(100)));
        assert_eq!(cart.count(), 2);
        assert_eq!(
            cart.backend().calls(),
            vec![Call::Add("7".to_string(), 2), Call::Fetch]
        );
    }

    #[tokio::test]
    async fn test_add_without_id_is_skipped() {
        let mut cart = CartSynchronizer::new(FakeBackend::default());
        let outcome = cart.add(&product("", "10"), 1).await.unwrap();

        assert_eq!(outcome, SyncOutcome::Skipped);
        assert!(cart.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_is_absolute() {
        let rice = product("3", "40");
        let mut cart = CartSynchronizer::new(FakeBackend::with_catalog(vec![rice.clone()]));
        cart.add(&rice, 5).await.unwrap();

        cart.update_quantity("3", 2).await.unwrap();

        assert_eq!(cart.count(), 2);
        assert_eq!(cart.total(), Some(Decimal::from(80)));
    }

    #[tokio::test]
    async fn test_invalid_ids_are_skipped() {
        let mut cart = CartSynchronizer::new(FakeBackend::default());

        assert_eq!(cart.update_quantity("  ", 1).await.unwrap(), SyncOutcome::Skipped);
        assert_eq!(cart.remove("").await.unwrap(), SyncOutcome::Skipped);
        assert!(cart.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_leaves_count_unchanged() {
        let eggs = product("1", "72");
        let mut cart = CartSynchronizer::new(FakeBackend::with_catalog(vec![eggs.clone()]));
        cart.add(&eggs, 3).await.unwrap();

        let outcome = cart.remove("42").await.unwrap();

        assert_eq!(outcome, SyncOutcome::Synced);
        assert_eq!(cart.count(), 3);
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_snapshot() {
        let eggs = product("1", "72");
        let mut cart = CartSynchronizer::new(FakeBackend::with_catalog(vec![eggs.clone()]));
        cart.add(&eggs, 1).await.unwrap();

        let err = cart.update_quantity("9", 4).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(cart.count(), 1);
    }

    #[tokio::test]
    async fn test_clear_sends_one_remove_per_line_and_empties() {
        let catalog = vec![product("1", "10"), product("2", "20"), product("3", "30")];
        let mut backend = FakeBackend::with_catalog(catalog.clone());
        backend.failing_deletes.insert("2".to_string());
        let mut cart = CartSynchronizer::new(backend);
        for p in &catalog {
            cart.add(p, 1).await.unwrap();
        }

        let summary = cart.clear().await;

        assert_eq!(summary, ClearSummary { attempted: 3, failed: 1 });
        assert_eq!(cart.count(), 0);
        assert!(cart.items().is_empty());
        let deletes = cart
            .backend()
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Delete(_)))
            .count();
        assert_eq!(deletes, 3);
        // The failed line is still on the server.
        assert_eq!(cart.backend().lines.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_total_none_for_non_numeric_price() {
        let odd = product("5", "N/A");
        let mut cart = CartSynchronizer::new(FakeBackend::with_catalog(vec![odd.clone()]));
        cart.add(&odd, 1).await.unwrap();

        assert_eq!(cart.total(), None);
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = CartSynchronizer::new(FakeBackend::default());
        assert_eq!(cart.total(), Some(Decimal::ZERO));
        assert_eq!(cart.count(), 0);
    }
}
