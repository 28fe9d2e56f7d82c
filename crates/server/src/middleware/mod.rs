//! HTTP middleware stack for the wishlist API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS
//! 5. Panic catcher (JSON 500)
//! 6. `/wishlist` only: rate limiting (governor), then the origin gate

pub mod cors;
pub mod origin;
pub mod panic;
pub mod rate_limit;
pub mod request_id;

pub use cors::cors_layer;
pub use origin::{is_authorized, origin_gate_middleware};
pub use panic::catch_panic_layer;
pub use rate_limit::wishlist_rate_limiter;
pub use request_id::request_id_middleware;
