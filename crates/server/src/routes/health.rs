//! Liveness and service description endpoints.

use axum::{
    Json,
    http::{Method, Uri},
};
use chrono::Utc;
use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Liveness health check endpoint.
///
/// GET /health
///
/// Does not call Shopify.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [&'static str],
}

/// Endpoints listed by [`index`].
pub const ENDPOINTS: &[&str] = &[
    "POST /wishlist/add",
    "GET /wishlist?customerId=<id>",
    "DELETE /wishlist/remove",
    "GET /health",
];

/// Service name, version and endpoint listing.
///
/// GET /
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS,
    })
}

/// Fallback for unmatched routes and methods.
pub async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {method} {} not found", uri.path()))
}
