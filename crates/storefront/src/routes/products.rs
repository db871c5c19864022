//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use grocer_core::{CatalogQuery, CatalogView, NewProduct, Product, SortKey, query};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for `GET /api/products/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Query parameters for `GET /api/products/view`.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
}

impl From<ViewParams> for CatalogQuery {
    fn from(params: ViewParams) -> Self {
        Self {
            search: params.search.unwrap_or_default(),
            category: params.category.unwrap_or_default(),
            sort: params
                .sort
                .as_deref()
                .map_or(SortKey::default(), SortKey::parse),
            page: params.page.unwrap_or(1),
        }
    }
}

/// List every product in catalog order.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog().get_all())
}

/// Search name, brand and category.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Product>>> {
    let q = params
        .q
        .ok_or_else(|| AppError::BadRequest("query parameter 'q' is required".to_string()))?;
    Ok(Json(state.catalog().search(&q)))
}

/// Products in exactly this category.
#[instrument(skip(state))]
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<Vec<Product>> {
    Json(state.catalog().by_category(&category))
}

/// Filtered, sorted and windowed catalog.
#[instrument(skip(state))]
pub async fn view(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Json<CatalogView> {
    let products = state.catalog().get_all();
    Json(query::run(&products, &params.into()))
}

/// Distinct categories, sorted.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog().categories())
}

/// Append a product with the next catalog id.
#[instrument(skip(state, new_product), fields(product_name = %new_product.product_name))]
pub async fn create(
    State(state): State<AppState>,
    Json(new_product): Json<NewProduct>,
) -> Json<Product> {
    let product = state.catalog().create(new_product);
    tracing::info!(product_id = %product.id, "Product created");
    Json(product)
}
