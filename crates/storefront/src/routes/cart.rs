//! Cart route handlers.
//!
//! The server cart is the source of truth for quantities. `POST` answers with
//! the whole cart so callers can skip a refetch; `PUT` and `DELETE` only
//! acknowledge.

use axum::{
    Json,
    extract::{Path, State},
};
use grocer_core::{CartItem, CartLineRequest, StatusResponse};
use tracing::instrument;

use crate::cart::validate;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Current cart lines joined with catalog products.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<Vec<CartItem>> {
    Json(state.cart().items(state.catalog()))
}

/// Add `quantity` of a product, creating the line if needed.
#[instrument(skip(state), fields(product_id = %line.product_id, quantity = line.quantity))]
pub async fn add(
    State(state): State<AppState>,
    Json(line): Json<CartLineRequest>,
) -> Result<Json<Vec<CartItem>>> {
    validate(&line.product_id, line.quantity)?;
    if !state.catalog().contains(line.product_id.as_str()) {
        return Err(AppError::NotFound(format!("product {}", line.product_id)));
    }

    let quantity = state.cart().add(&line.product_id, line.quantity)?;
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", line.product_id.as_str())]),
    );
    tracing::info!(line_quantity = quantity, "Cart line increased");

    Ok(Json(state.cart().items(state.catalog())))
}

/// Set a line's quantity.
#[instrument(skip(state), fields(product_id = %line.product_id, quantity = line.quantity))]
pub async fn update(
    State(state): State<AppState>,
    Json(line): Json<CartLineRequest>,
) -> Result<Json<StatusResponse>> {
    state.cart().set_quantity(&line.product_id, line.quantity)?;
    add_breadcrumb(
        "cart",
        "Updated cart quantity",
        Some(&[("product_id", line.product_id.as_str())]),
    );

    Ok(Json(StatusResponse::ok()))
}

/// Remove a line. Removing an absent line succeeds.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Json<StatusResponse> {
    if state.cart().remove(&product_id) {
        add_breadcrumb(
            "cart",
            "Removed from cart",
            Some(&[("product_id", product_id.as_str())]),
        );
    } else {
        tracing::debug!("Remove for product not in cart");
    }

    Json(StatusResponse::ok())
}
