//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness check
//! GET    /health/ready                    - Readiness (catalog loaded)
//!
//! # Products
//! GET    /api/products                    - All products
//! POST   /api/products                    - Create product
//! GET    /api/products/search?q=          - Search name, brand, category
//! GET    /api/products/category/{name}    - Exact category
//! GET    /api/products/view               - Filtered, sorted, windowed view
//! GET    /api/products/categories         - Category list
//!
//! # Cart
//! GET    /api/cart                        - Cart lines with products
//! POST   /api/cart                        - Add (increase) a line
//! PUT    /api/cart                        - Set a line's quantity
//! DELETE /api/cart/{product_id}           - Remove a line
//!
//! # Chat
//! POST   /api/chat                        - Shopping assistant (rate limited)
//! ```

pub mod cart;
pub mod chat;
pub mod health;
pub mod products;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{chat_rate_limiter, request_id_middleware};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/search", get(products::search))
        .route("/view", get(products::view))
        .route("/categories", get(products::categories))
        .route("/category/{category}", get(products::by_category))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add).put(cart::update))
        .route("/{product_id}", delete(cart::remove))
}

/// Create the chat routes router.
pub fn chat_routes() -> Router<AppState> {
    let router = Router::new().route("/chat", post(chat::send));
    match chat_rate_limiter() {
        Some(limiter) => router.layer(limiter),
        None => {
            tracing::warn!("Chat rate limiter unavailable, serving without limits");
            router
        }
    }
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .merge(chat_routes())
}

/// Build the complete application with middleware and state applied.
///
/// Sentry layers are added by the binary so tests can run without a client.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
