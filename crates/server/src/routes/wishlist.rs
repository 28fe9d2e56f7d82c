//! Wishlist JSON endpoints.
//!
//! All three endpoints run behind the origin gate and the rate limiter.

use axum::{
    Json,
    extract::{Query, State, rejection::{JsonRejection, QueryRejection}},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use wishlist_core::{CustomerId, ProductId, RawId, WishlistEntry};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::shopify::ShopifyApi;
use crate::state::AppState;

/// Body of `POST /wishlist/add` and `DELETE /wishlist/remove`.
///
/// Fields are optional so a missing field is reported as a validation error
/// rather than a deserialization error. Ids may be strings or numbers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemRequest {
    pub customer_id: Option<RawId>,
    pub product_id: Option<RawId>,
}

/// Query of `GET /wishlist`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistQuery {
    pub customer_id: Option<String>,
}

/// Success envelope shared by the wishlist endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    const fn ok(message: Option<&'static str>, data: T) -> Self {
        Self {
            success: true,
            message,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedData {
    pub customer_id: String,
    pub product: WishlistEntry,
    pub wishlist_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistData {
    pub customer_id: String,
    pub wishlist: Vec<WishlistEntry>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedData {
    pub customer_id: String,
    pub product_id: String,
    pub wishlist_count: usize,
}

/// Add a product to a customer's wishlist.
///
/// POST /wishlist/add
///
/// # Errors
///
/// 400 on missing fields, 409 if already present, 500 on Shopify failure.
pub async fn add<C: ShopifyApi + 'static>(
    State(state): State<AppState<C>>,
    payload: std::result::Result<Json<WishlistItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AddedData>>)> {
    let Json(payload) = payload?;
    let (customer, product) = parse_item(payload)?;

    add_breadcrumb(
        "wishlist",
        "Add product",
        &[("customer_id", customer.bare()), ("product_id", product.bare())],
    );

    let outcome = state.wishlist().add(&customer, &product).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            Some("Product added to wishlist"),
            AddedData {
                customer_id: customer.bare().to_string(),
                product: outcome.entry,
                wishlist_count: outcome.count,
            },
        )),
    ))
}

/// Get a customer's wishlist.
///
/// GET /wishlist?customerId=<id>
///
/// # Errors
///
/// 400 on a missing `customerId`, 500 on Shopify failure.
pub async fn get<C: ShopifyApi + 'static>(
    State(state): State<AppState<C>>,
    query: std::result::Result<Query<WishlistQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<WishlistData>>> {
    let Query(query) = query?;
    let customer = parse_customer(
        required(query.customer_id.as_deref()).ok_or_else(|| {
            AppError::Validation("customerId query parameter is required".to_string())
        })?,
    )?;

    let wishlist = state.wishlist().get(&customer).await?;
    let count = wishlist.len();

    Ok(Json(ApiResponse::ok(
        None,
        WishlistData {
            customer_id: customer.bare().to_string(),
            wishlist: wishlist.into_entries(),
            count,
        },
    )))
}

/// Remove a product from a customer's wishlist.
///
/// DELETE /wishlist/remove
///
/// # Errors
///
/// 400 on missing fields, 404 if the product is not present, 500 on Shopify
/// failure.
pub async fn remove<C: ShopifyApi + 'static>(
    State(state): State<AppState<C>>,
    payload: std::result::Result<Json<WishlistItemRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<RemovedData>>> {
    let Json(payload) = payload?;
    let (customer, product) = parse_item(payload)?;

    add_breadcrumb(
        "wishlist",
        "Remove product",
        &[("customer_id", customer.bare()), ("product_id", product.bare())],
    );

    let outcome = state.wishlist().remove(&customer, &product).await?;

    Ok(Json(ApiResponse::ok(
        Some("Product removed from wishlist"),
        RemovedData {
            customer_id: customer.bare().to_string(),
            product_id: product.bare().to_string(),
            wishlist_count: outcome.count,
        },
    )))
}

/// Trimmed, non-empty value.
fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_item(payload: WishlistItemRequest) -> Result<(CustomerId, ProductId)> {
    let customer = payload.customer_id.map(RawId::into_string);
    let product = payload.product_id.map(RawId::into_string);
    let (Some(customer), Some(product)) = (
        required(customer.as_deref()),
        required(product.as_deref()),
    ) else {
        return Err(AppError::Validation(
            "customerId and productId are required".to_string(),
        ));
    };

    let product = ProductId::parse(product)
        .map_err(|e| AppError::Validation(format!("Invalid productId: {e}")))?;

    Ok((parse_customer(customer)?, product))
}

fn parse_customer(raw: &str) -> Result<CustomerId> {
    CustomerId::parse(raw).map_err(|e| AppError::Validation(format!("Invalid customerId: {e}")))
}
