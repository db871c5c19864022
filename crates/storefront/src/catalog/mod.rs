//! In-memory product catalog.
//!
//! The catalog is loaded once at startup from a CSV file and then served
//! from memory. Until loading has run, every query answers with an empty
//! result instead of blocking. A source that cannot be read leaves the
//! catalog empty; it never stops the process.
//!
//! Ids are assigned from an atomic counter owned by the store, so concurrent
//! inserts can never hand out the same id twice.

pub mod csv;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use grocer_core::{NewProduct, Product, ProductId};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Errors that prevent a catalog source from being loaded.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The source file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source has no header line.
    #[error("catalog source is empty")]
    MissingHeader,

    /// The header does not describe enough columns.
    #[error("catalog header has {found} columns, expected at least {expected}")]
    Header { found: usize, expected: usize },
}

/// Outcome of loading a catalog source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Products added to the catalog.
    pub loaded: usize,
    /// Rows dropped for a field count mismatch.
    pub skipped: usize,
}

/// Products keyed by id, kept in insertion order.
#[derive(Debug, Default)]
struct CatalogIndex {
    products: Vec<Product>,
    positions: HashMap<ProductId, usize>,
}

impl CatalogIndex {
    fn insert(&mut self, product: Product) {
        self.positions
            .insert(product.id.clone(), self.products.len());
        self.products.push(product);
    }

    fn get(&self, id: &str) -> Option<&Product> {
        self.positions
            .get(id)
            .and_then(|&position| self.products.get(position))
    }
}

/// The product catalog.
///
/// Cheaply cloneable; all clones share the same products and id counter.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    index: RwLock<Option<CatalogIndex>>,
    next_id: AtomicU64,
    /// Set once a load has run; `create` alone does not set it.
    loaded: AtomicBool,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Create a catalog that has not been loaded yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                index: RwLock::new(None),
                next_id: AtomicU64::new(1),
                loaded: AtomicBool::new(false),
            }),
        }
    }

    /// Load the catalog from a CSV file.
    ///
    /// Never fails: a source that cannot be read or parsed is logged and the
    /// catalog comes up empty.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn initialize(&self, path: &Path) -> LoadReport {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) => {
                let error = CatalogError::Io {
                    path: path.to_path_buf(),
                    source,
                };
                warn!(error = %error, "Catalog unavailable, starting empty");
                self.mark_loaded();
                return LoadReport::default();
            }
        };
        self.load_from_str(&text)
    }

    /// Load products from CSV text.
    ///
    /// Products are appended to whatever the catalog already holds, with ids
    /// continuing from the counter.
    pub fn load_from_str(&self, text: &str) -> LoadReport {
        let rows = match csv::parse_rows(text) {
            Ok(rows) => rows,
            Err(error) => {
                warn!(error = %error, "Catalog unreadable, starting empty");
                self.mark_loaded();
                return LoadReport::default();
            }
        };

        let report = LoadReport {
            loaded: rows.products.len(),
            skipped: rows.skipped,
        };

        let mut guard = self.write();
        let index = guard.get_or_insert_with(CatalogIndex::default);
        for new_product in rows.products {
            index.insert(new_product.with_id(self.next_id()));
        }
        drop(guard);
        self.mark_loaded();

        info!(
            loaded = report.loaded,
            skipped = report.skipped,
            "Loaded products into memory"
        );
        report
    }

    /// Whether a load has completed, successfully or not.
    ///
    /// Products created before the first load do not count.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.loaded.load(Ordering::Acquire)
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().as_ref().map_or(0, |index| index.products.len())
    }

    /// Whether the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All products in load order.
    #[must_use]
    pub fn get_all(&self) -> Vec<Product> {
        self.collect(|_| true)
    }

    /// Case-insensitive substring search over name, brand and category.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Product> {
        let needle = query.to_lowercase();
        self.collect(|product| {
            product.product_name.to_lowercase().contains(&needle)
                || product.brand.to_lowercase().contains(&needle)
                || product.category.to_lowercase().contains(&needle)
        })
    }

    /// Products whose category is exactly `category`.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<Product> {
        self.collect(|product| product.category == category)
    }

    /// Look up one product.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Product> {
        self.read().as_ref().and_then(|index| index.get(id).cloned())
    }

    /// Whether a product with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.read()
            .as_ref()
            .is_some_and(|index| index.positions.contains_key(id))
    }

    /// Distinct categories, ascending.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.read()
            .as_ref()
            .map_or_else(Vec::new, |index| grocer_core::query::categories(&index.products))
    }

    /// Insert a product under the next sequential id.
    pub fn create(&self, new_product: NewProduct) -> Product {
        let mut guard = self.write();
        let product = new_product.with_id(self.next_id());
        guard
            .get_or_insert_with(CatalogIndex::default)
            .insert(product.clone());
        drop(guard);

        info!(id = %product.id, "Created product");
        product
    }

    fn next_id(&self) -> ProductId {
        ProductId::from_sequence(self.inner.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn mark_loaded(&self) {
        self.write().get_or_insert_with(CatalogIndex::default);
        self.inner.loaded.store(true, Ordering::Release);
    }

    fn collect(&self, predicate: impl Fn(&Product) -> bool) -> Vec<Product> {
        self.read().as_ref().map_or_else(Vec::new, |index| {
            index
                .products
                .iter()
                .filter(|product| predicate(product))
                .cloned()
                .collect()
        })
    }

    // Readers never observe a half-applied insert, so a poisoned lock still
    // guards a consistent index.
    fn read(&self) -> RwLockReadGuard<'_, Option<CatalogIndex>> {
        self.inner
            .index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<CatalogIndex>> {
        self.inner
            .index
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
