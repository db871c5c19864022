//! Catalog query engine.
//!
//! Views are derived from the full product list on every call: filter by
//! search text and category, order by a [`SortKey`], then cut a window that
//! grows by [`PAGE_SIZE`] products per page. Nothing derived is cached, so a
//! view always reflects the catalog it was computed from.
//!
//! # Example
//!
//! ```rust
//! use grocer_core::{Browser, SortKey};
//!
//! let catalog = Vec::new();
//! let mut browser = Browser::new();
//! browser.set_search("milk");
//! browser.set_sort(SortKey::PriceLow);
//!
//! let view = browser.view(&catalog);
//! assert!(view.items.is_empty());
//! assert!(!view.has_more);
//! ```

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::Product;

/// Number of products added to the visible window per page.
pub const PAGE_SIZE: usize = 50;

/// Sort orders offered by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Product name, A to Z.
    #[default]
    Name,
    /// Selling price, lowest first.
    PriceLow,
    /// Selling price, highest first.
    PriceHigh,
    /// Largest discount fraction first.
    Discount,
}

impl SortKey {
    /// Wire name of the sort key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Discount => "discount",
        }
    }

    /// Parse a wire name, falling back to [`SortKey::Name`] for anything unknown.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "discount" => Self::Discount,
            _ => Self::Name,
        }
    }
}

/// Inputs of a catalog view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Matched case-insensitively against name and brand; empty matches all.
    pub search: String,
    /// Exact category; empty matches all.
    pub category: String,
    pub sort: SortKey,
    /// 1-based; the window holds `page * PAGE_SIZE` products.
    pub page: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: String::new(),
            sort: SortKey::Name,
            page: 1,
        }
    }
}

/// The visible window of a filtered and sorted catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogView {
    /// Products in display order, at most `page * PAGE_SIZE` of them.
    pub items: Vec<Product>,
    /// Number of products matching the filter.
    pub total: usize,
    pub page: usize,
    /// Whether another page would show more products.
    pub has_more: bool,
}

/// Compute the view of `catalog` for `query`.
#[must_use]
pub fn run(catalog: &[Product], query: &CatalogQuery) -> CatalogView {
    let mut matched = filter(catalog, &query.search, &query.category);
    sort(&mut matched, query.sort);

    let page = query.page.max(1);
    let total = matched.len();
    let visible = window_len(total, page);

    CatalogView {
        items: matched.into_iter().take(visible).cloned().collect(),
        total,
        page,
        has_more: page.saturating_mul(PAGE_SIZE) < total,
    }
}

/// Products whose name or brand contains `search` and whose category equals `category`.
#[must_use]
pub fn filter<'a>(catalog: &'a [Product], search: &str, category: &str) -> Vec<&'a Product> {
    let needle = search.to_lowercase();
    catalog
        .iter()
        .filter(|product| matches(product, &needle, category))
        .collect()
}

/// Filter predicate; `needle` must already be lowercase.
#[must_use]
pub fn matches(product: &Product, needle: &str, category: &str) -> bool {
    let matches_search = needle.is_empty()
        || product.product_name.to_lowercase().contains(needle)
        || product.brand.to_lowercase().contains(needle);
    let matches_category = category.is_empty() || product.category == category;
    matches_search && matches_category
}

/// Order products in place.
///
/// Every order is applied on top of name order with a stable sort, so
/// products with equal keys stay alphabetical.
pub fn sort(products: &mut [&Product], key: SortKey) {
    products.sort_by(|a, b| compare_names(&a.product_name, &b.product_name));

    match key {
        SortKey::Name => {}
        SortKey::PriceLow => products.sort_by(|a, b| {
            compare_prices(a.discount_amount(), b.discount_amount(), true)
        }),
        SortKey::PriceHigh => products.sort_by(|a, b| {
            compare_prices(a.discount_amount(), b.discount_amount(), false)
        }),
        SortKey::Discount => {
            products.sort_by(|a, b| b.discount_fraction().cmp(&a.discount_fraction()));
        }
    }
}

/// Distinct categories of the catalog, ascending.
#[must_use]
pub fn categories(catalog: &[Product]) -> Vec<String> {
    catalog
        .iter()
        .map(|product| product.category.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Length of the visible window for `total` matches at `page`.
#[must_use]
pub fn window_len(total: usize, page: usize) -> usize {
    page.max(1).saturating_mul(PAGE_SIZE).min(total)
}

/// Case-insensitive name order with a byte-order tie-break.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Compare parsed prices. Unparsable prices go last in both directions.
fn compare_prices<T: Ord>(a: Option<T>, b: Option<T>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if ascending => a.cmp(&b),
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Interactive browsing state: the current query plus the window counter.
///
/// Changing the search text, the category or the sort key resets the window
/// to the first page; [`Browser::load_more`] grows it by one page.
#[derive(Debug, Clone, Default)]
pub struct Browser {
    query: CatalogQuery,
}

impl Browser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.query.page = 1;
    }

    /// Select a category; an empty string shows all categories.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.query.category = category.into();
        self.query.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.query.sort = sort;
        self.query.page = 1;
    }

    pub fn load_more(&mut self) {
        self.query.page = self.query.page.saturating_add(1);
    }

    #[must_use]
    pub const fn query(&self) -> &CatalogQuery {
        &self.query
    }

    #[must_use]
    pub fn view(&self, catalog: &[Product]) -> CatalogView {
        run(catalog, &self.query)
    }
}
