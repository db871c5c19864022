//! Cart commands.
//!
//! Each command refreshes a [`CartSynchronizer`], applies one mutation and
//! logs the resulting snapshot.

use grocer_client::{CartSynchronizer, StorefrontApi, SyncOutcome};
use grocer_core::Price;
use tracing::{info, warn};

type Cart = CartSynchronizer<StorefrontApi>;

async fn open(api: StorefrontApi) -> Result<Cart, Box<dyn std::error::Error>> {
    let mut cart = CartSynchronizer::new(api);
    cart.refresh().await?;
    Ok(cart)
}

fn report(cart: &Cart) {
    for item in cart.items() {
        info!(
            id = %item.product.id,
            quantity = item.quantity,
            price = %item.product.discount_price,
            "{}",
            item.product.product_name
        );
    }
    let total = cart
        .total()
        .map_or_else(|| "n/a".to_string(), |total| Price::catalog(total).to_string());
    info!(lines = cart.items().len(), count = cart.count(), %total, "Cart");
}

fn skipped(outcome: SyncOutcome, product_id: &str) {
    if outcome == SyncOutcome::Skipped {
        warn!(product_id, "Invalid product id, nothing sent");
    }
}

/// Show the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be fetched.
pub async fn show(api: StorefrontApi) -> Result<(), Box<dyn std::error::Error>> {
    let cart = open(api).await?;
    report(&cart);
    Ok(())
}

/// Add a catalog product to the cart.
///
/// # Errors
///
/// Returns an error if the product is unknown or a request fails.
pub async fn add(
    api: StorefrontApi,
    product_id: &str,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = api
        .products()
        .await?
        .into_iter()
        .find(|p| p.id.as_str() == product_id.trim())
        .ok_or_else(|| format!("Product not found: {product_id}"))?;

    let mut cart = open(api).await?;
    let outcome = cart.add(&product, quantity).await?;
    skipped(outcome, product_id);
    report(&cart);
    Ok(())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the line does not exist or a request fails.
pub async fn update(
    api: StorefrontApi,
    product_id: &str,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = open(api).await?;
    let outcome = cart.update_quantity(product_id, quantity).await?;
    skipped(outcome, product_id);
    report(&cart);
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if a request fails.
pub async fn remove(
    api: StorefrontApi,
    product_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = open(api).await?;
    let outcome = cart.remove(product_id).await?;
    skipped(outcome, product_id);
    report(&cart);
    Ok(())
}

/// Remove every line.
///
/// # Errors
///
/// Returns an error if the cart cannot be fetched.
pub async fn clear(api: StorefrontApi) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = open(api).await?;
    let summary = cart.clear().await;
    if summary.failed > 0 {
        warn!(
            failed = summary.failed,
            attempted = summary.attempted,
            "Some lines could not be removed; the server cart may not be empty"
        );
    } else {
        info!(removed = summary.attempted, "Cart cleared");
    }
    Ok(())
}
