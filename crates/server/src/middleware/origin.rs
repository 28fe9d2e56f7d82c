//! Origin gate for the wishlist routes.
//!
//! The API has no customer authentication; requests are accepted only from
//! the storefront (or from the development host in development mode).
//! Rejected requests never reach a handler, so no Shopify call is made.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::config::{Environment, GateConfig};
use crate::error::AppError;
use crate::shopify::ShopifyApi;
use crate::state::AppState;

/// Decide whether a request may reach the wishlist operations.
///
/// - In development, a `host` containing the configured dev host passes.
/// - Otherwise `origin` (the `Origin` header, or `Referer` when absent) must
///   start with the storefront URL at a host boundary.
#[must_use]
pub fn is_authorized(
    origin: Option<&str>,
    host: Option<&str>,
    environment: Environment,
    gate: &GateConfig,
) -> bool {
    if environment.is_development() && host.is_some_and(|h| h.contains(gate.dev_host.as_str())) {
        return true;
    }

    origin.is_some_and(|o| matches_storefront(o, &gate.storefront_url))
}

/// `candidate` starts with `storefront` and does not continue the host name
/// (so `https://shop.example.evil` does not match `https://shop.example`).
fn matches_storefront(candidate: &str, storefront: &str) -> bool {
    candidate
        .strip_prefix(storefront)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']))
}

/// Declared origin of a request: `Origin`, falling back to `Referer`.
fn request_origin(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::ORIGIN)
        .or_else(|| headers.get(header::REFERER))
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && *v != "null")
}

/// Middleware rejecting requests that fail [`is_authorized`] with 403.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] for unauthorized requests.
pub async fn origin_gate_middleware<C: ShopifyApi + 'static>(
    State(state): State<AppState<C>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let origin = request_origin(headers);
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| request.uri().host());

    let config = state.config();
    if !is_authorized(origin, host, config.environment, &config.gate) {
        tracing::warn!(
            origin = origin.unwrap_or("-"),
            host = host.unwrap_or("-"),
            "Rejected request from unauthorized origin"
        );
        return Err(AppError::Forbidden(
            "Request origin is not allowed".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
