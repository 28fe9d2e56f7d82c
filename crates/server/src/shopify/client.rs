//! Shopify Admin API client implementation.
//!
//! Uses `graphql_client` request/response envelopes with `reqwest` 0.13 for
//! HTTP. REST calls share the same versioned Admin API root and token.

use std::sync::Arc;

use graphql_client::{QueryBody, Response};
use reqwest::Method;
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};

use crate::config::ShopifyAdminConfig;

use super::{
    GraphQLDocument, GraphQLError, GraphQLErrorLocation, RestMethod, ShopifyApi, ShopifyError,
};

/// Header carrying the Admin API access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Maximum number of response body characters kept in errors and logs.
const BODY_EXCERPT_CHARS: usize = 500;

/// Client for the Shopify Admin API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl AdminClient {
    /// Create a new Admin API client.
    #[must_use]
    pub fn new(config: &ShopifyAdminConfig) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                base_url: config.admin_base_url(),
                access_token: config.access_token.expose_secret().to_string(),
            }),
        }
    }

    fn graphql_endpoint(&self) -> String {
        format!("{}/graphql.json", self.inner.base_url)
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    async fn send_graphql(
        &self,
        document: &GraphQLDocument,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, ShopifyError> {
        let request_body = QueryBody {
            variables,
            query: document.query,
            operation_name: document.operation_name,
        };

        let response = self
            .inner
            .client
            .post(self.graphql_endpoint())
            .header(ACCESS_TOKEN_HEADER, &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ShopifyError::RateLimited(retry_after(&response)));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %excerpt(&response_text),
                "Shopify Admin API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![GraphQLError {
                message: format!("HTTP {status}: {}", excerpt(&response_text)),
                locations: vec![],
                path: vec![],
            }]));
        }

        let response: Response<serde_json::Value> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %excerpt(&response_text),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");

            return Err(ShopifyError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        locations: e.locations.map_or_else(Vec::new, |locs| {
                            locs.into_iter()
                                .map(|l| GraphQLErrorLocation {
                                    line: i64::from(l.line),
                                    column: i64::from(l.column),
                                })
                                .collect()
                        }),
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => {
                                        serde_json::Value::String(s)
                                    }
                                    graphql_client::PathFragment::Index(i) => {
                                        serde_json::Value::Number(i.into())
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %excerpt(&response_text),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::MissingData("data")
        })
    }
}

impl ShopifyApi for AdminClient {
    #[instrument(skip(self, variables), fields(operation = %document.operation_name))]
    async fn graphql(
        &self,
        document: &GraphQLDocument,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, ShopifyError> {
        self.send_graphql(document, variables).await
    }

    #[instrument(skip(self))]
    async fn rest_read(&self, path: &str) -> Result<Option<serde_json::Value>, ShopifyError> {
        let response = self
            .inner
            .client
            .get(self.rest_url(path))
            .header(ACCESS_TOKEN_HEADER, &self.inner.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = %status, "REST read returned non-success status, treating as absent");
            return Ok(None);
        }

        let body = response.text().await?;
        Ok(rest_read_body(&body))
    }

    #[instrument(skip(self, body), fields(method = method.as_str()))]
    async fn rest_write(
        &self,
        path: &str,
        method: RestMethod,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ShopifyError> {
        let http_method = match method {
            RestMethod::Post => Method::POST,
            RestMethod::Put => Method::PUT,
        };

        let response = self
            .inner
            .client
            .request(http_method, self.rest_url(path))
            .header(ACCESS_TOKEN_HEADER, &self.inner.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ShopifyError::RateLimited(retry_after(&response)));
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %excerpt(&response_text),
                "Shopify REST write failed"
            );
            return Err(ShopifyError::Status {
                status: status.as_u16(),
                body: excerpt(&response_text),
            });
        }

        if response_text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        Ok(serde_json::from_str(&response_text)?)
    }
}

/// Seconds to wait from a `Retry-After` header (default 1).
///
/// The REST API sends fractional values such as `2.0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn retry_after(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<f64>().ok())
        .map_or(1, |secs| secs.ceil().max(0.0) as u64)
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

/// Parse a successful REST read; a body that is not JSON counts as absent.
fn rest_read_body(body: &str) -> Option<serde_json::Value> {
    match serde_json::from_str(body) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                error = %e,
                body = %excerpt(body),
                "REST read returned a non-JSON body, treating as absent"
            );
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn client() -> AdminClient {
        AdminClient::new(&ShopifyAdminConfig {
            store: "test.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            shop_domain: "shop.test".to_string(),
            access_token: SecretString::from("shpat_token"),
        })
    }

    #[test]
    fn test_graphql_endpoint() {
        assert_eq!(
            client().graphql_endpoint(),
            "https://test.myshopify.com/admin/api/2026-01/graphql.json"
        );
    }

    #[test]
    fn test_rest_url_strips_leading_slash() {
        let client = client();
        assert_eq!(
            client.rest_url("/customers/1/metafields.json"),
            "https://test.myshopify.com/admin/api/2026-01/customers/1/metafields.json"
        );
        assert_eq!(
            client.rest_url("customers/1/metafields.json"),
            "https://test.myshopify.com/admin/api/2026-01/customers/1/metafields.json"
        );
    }

    #[test]
    fn test_rest_read_body_parses_json() {
        let value = rest_read_body(r#"{"metafields":[]}"#).unwrap();
        assert_eq!(value["metafields"], serde_json::json!([]));
    }

    #[test]
    fn test_rest_read_body_non_json_is_absent() {
        assert!(rest_read_body("<html>Service Unavailable</html>").is_none());
        assert!(rest_read_body("").is_none());
    }

    #[test]
    fn test_excerpt_truncates() {
        let long = "x".repeat(BODY_EXCERPT_CHARS + 10);
        assert_eq!(excerpt(&long).len(), BODY_EXCERPT_CHARS);
    }
}
