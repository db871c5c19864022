//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (permissive)
//! 5. Rate limiting on the chat route (governor)

pub mod rate_limit;
pub mod request_id;

pub use rate_limit::chat_rate_limiter;
pub use request_id::request_id_middleware;
