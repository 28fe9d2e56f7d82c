//! HTTP route handlers for the wishlist API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                         - Service name, version and endpoints
//! GET    /health                   - Health check
//!
//! # Wishlist (origin gate + rate limit)
//! POST   /wishlist/add             - Add product {customerId, productId}
//! GET    /wishlist?customerId=<id> - List wishlist
//! DELETE /wishlist/remove          - Remove product {customerId, productId}
//! ```
//!
//! Anything else is a JSON 404.

pub mod health;
pub mod wishlist;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
};
use tower::ServiceBuilder;

use crate::middleware::{
    catch_panic_layer, cors_layer, origin_gate_middleware, request_id_middleware,
    wishlist_rate_limiter,
};
use crate::shopify::ShopifyApi;
use crate::state::AppState;

/// Create the wishlist routes router.
///
/// Gate and limiter are route layers so unmatched paths fall through to the
/// 404 fallback instead of being rejected.
pub fn wishlist_routes<C: ShopifyApi + 'static>(state: &AppState<C>) -> Router<AppState<C>> {
    Router::new()
        .route("/wishlist", get(wishlist::get::<C>))
        .route("/wishlist/add", post(wishlist::add::<C>))
        .route("/wishlist/remove", delete(wishlist::remove::<C>))
        .route_layer(from_fn_with_state(
            state.clone(),
            origin_gate_middleware::<C>,
        ))
        .route_layer(wishlist_rate_limiter())
}

/// Build the full application router.
pub fn router<C: ShopifyApi + 'static>(state: AppState<C>) -> Router {
    let development = state.config().environment.is_development();

    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
        .merge(wishlist_routes(&state))
        .fallback(health::not_found)
        .method_not_allowed_fallback(health::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(cors_layer(state.config()))
                .layer(catch_panic_layer(development)),
        )
        .with_state(state)
}
