//! Shopify Admin API access for customer metafields and products.
//!
//! # Architecture
//!
//! - [`ShopifyApi`] is the seam between the wishlist logic and Shopify: one
//!   GraphQL entry point plus a REST read and a REST write
//! - [`AdminClient`] implements it with `reqwest`, using `graphql_client`
//!   request/response envelopes for GraphQL
//! - Shopify is source of truth - NO local sync, no caching, direct API calls
//! - No retries here; fallback policy belongs to the metafield synchronizer
//!
//! # Example
//!
//! ```rust,ignore
//! use wishlist_server::shopify::{AdminClient, ShopifyApi, queries};
//!
//! let client = AdminClient::new(&config.shopify);
//! let data = client
//!     .graphql(&queries::CUSTOMER_WISHLIST, serde_json::json!({ "id": customer.qualified() }))
//!     .await?;
//! ```

mod client;
pub mod queries;
#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use client::AdminClient;
pub use queries::GraphQLDocument;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Non-success HTTP status from a REST call.
    #[error("Shopify REST request failed with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        body: String,
    },

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User errors from a mutation (e.g., invalid metafield value).
    #[error("User errors: {}", format_user_errors(.0))]
    UserErrors(Vec<UserError>),

    /// A response was missing a field the operation depends on.
    #[error("Missing data in response: {0}")]
    MissingData(&'static str),
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

/// A field-level error from a mutation's `userErrors` list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct UserError {
    /// Input path the error refers to.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Human readable message.
    pub message: String,
    /// Machine readable code.
    #[serde(default)]
    pub code: Option<String>,
}

/// HTTP method for REST writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestMethod {
    /// Create a resource.
    Post,
    /// Update a resource.
    Put,
}

impl RestMethod {
    /// Method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

/// Remote data access used by the wishlist.
///
/// Implemented by [`AdminClient`] in production and by in-memory fakes in tests.
pub trait ShopifyApi: Send + Sync {
    /// Execute a GraphQL query or mutation and return its `data` object.
    ///
    /// Fails with [`ShopifyError::GraphQL`] if the response carries errors.
    fn graphql(
        &self,
        document: &GraphQLDocument,
        variables: serde_json::Value,
    ) -> impl Future<Output = Result<serde_json::Value, ShopifyError>> + Send;

    /// Fetch a REST resource (path relative to the versioned Admin API root).
    ///
    /// Returns `Ok(None)` for any non-success status or a non-JSON body;
    /// absence is expected.
    fn rest_read(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Option<serde_json::Value>, ShopifyError>> + Send;

    /// Create or update a REST resource.
    ///
    /// Fails with [`ShopifyError::Status`] on any non-success status.
    fn rest_write(
        &self,
        path: &str,
        method: RestMethod,
        body: serde_json::Value,
    ) -> impl Future<Output = Result<serde_json::Value, ShopifyError>> + Send;
}

/// Execute a GraphQL document and decode its `data` into `T`.
///
/// # Errors
///
/// Returns the transport/GraphQL error from `api`, or [`ShopifyError::Parse`]
/// if the data does not match `T`.
pub async fn query_as<T, A>(
    api: &A,
    document: &GraphQLDocument,
    variables: serde_json::Value,
) -> Result<T, ShopifyError>
where
    T: DeserializeOwned,
    A: ShopifyApi,
{
    let data = api.graphql(document, variables).await?;
    Ok(serde_json::from_value(data)?)
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| match &e.field {
            Some(field) if !field.is_empty() => format!("{} ({})", e.message, field.join(".")),
            _ => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
