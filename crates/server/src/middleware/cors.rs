//! CORS policy for browser calls from the storefront.

use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::WishlistConfig;
use crate::middleware::request_id::REQUEST_ID_HEADER;

/// Build the CORS layer.
///
/// Production allows only the storefront origin, and other origins get no
/// `access-control-allow-origin` header at all. Development mirrors the
/// request origin so local themes on any port work.
#[must_use]
pub fn cors_layer(config: &WishlistConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);

    if config.environment.is_development() {
        return layer.allow_origin(AllowOrigin::mirror_request());
    }

    match HeaderValue::from_str(&config.gate.storefront_url) {
        Ok(origin) => layer.allow_origin(AllowOrigin::list([origin])),
        Err(e) => {
            tracing::warn!(
                error = %e,
                storefront_url = %config.gate.storefront_url,
                "Storefront URL is not a valid origin header, CORS allows no origins"
            );
            layer
        }
    }
}
