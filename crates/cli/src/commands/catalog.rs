//! Catalog browsing commands.
//!
//! The full catalog is fetched once and the view is computed locally with the
//! same query engine the server uses.

use grocer_client::StorefrontApi;
use grocer_core::{Browser, Price, SortKey, parse_amount};
use tracing::info;

/// Show a filtered and sorted window of the catalog.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn browse(
    api: &StorefrontApi,
    search: String,
    category: String,
    sort: SortKey,
    pages: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let products = api.products().await?;

    let mut browser = Browser::new();
    browser.set_search(search);
    browser.set_category(category);
    browser.set_sort(sort);
    for _ in 1..pages {
        browser.load_more();
    }

    let view = browser.view(&products);
    let money = |text: &str| {
        parse_amount(text).map_or_else(
            || text.to_string(),
            |amount| Price::catalog(amount).to_string(),
        )
    };
    for product in &view.items {
        info!(
            id = %product.id,
            price = %money(&product.discount_price),
            mrp = %money(&product.price),
            "{} ({})",
            product.product_name,
            product.brand
        );
    }
    info!(
        shown = view.items.len(),
        total = view.total,
        page = view.page,
        has_more = view.has_more,
        sort = sort.as_str(),
        "Catalog view"
    );

    Ok(())
}

/// List all categories.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn categories(api: &StorefrontApi) -> Result<(), Box<dyn std::error::Error>> {
    let categories = api.categories().await?;
    for category in &categories {
        info!("{category}");
    }
    info!(count = categories.len(), "Categories");
    Ok(())
}
