//! Wishlist commands, run through the same service as the HTTP API.

use serde_json::json;
use wishlist_core::{CustomerId, ProductId};
use wishlist_server::config::WishlistConfig;
use wishlist_server::shopify::AdminClient;
use wishlist_server::wishlist::WishlistService;

use super::CliError;

fn client() -> Result<AdminClient, CliError> {
    let config = WishlistConfig::from_env()?;
    Ok(AdminClient::new(&config.shopify))
}

#[allow(clippy::print_stdout)]
fn print(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a customer's wishlist.
///
/// # Errors
///
/// Returns `CliError` on invalid ids, configuration or Shopify failure.
pub async fn get(customer: &str) -> Result<(), CliError> {
    let customer = CustomerId::parse(customer)?;
    let client = client()?;

    let wishlist = WishlistService::new(&client).get(&customer).await?;

    print(&json!({
        "customerId": customer.bare(),
        "count": wishlist.len(),
        "wishlist": wishlist,
    }))
}

/// Add a product to a customer's wishlist.
///
/// # Errors
///
/// Returns `CliError` on invalid ids, configuration, a duplicate product or
/// Shopify failure.
pub async fn add(customer: &str, product: &str) -> Result<(), CliError> {
    let customer = CustomerId::parse(customer)?;
    let product = ProductId::parse(product)?;
    let client = client()?;

    let outcome = WishlistService::new(&client).add(&customer, &product).await?;
    tracing::info!(channel = %outcome.channel, "Wishlist written");

    print(&json!({
        "customerId": customer.bare(),
        "product": outcome.entry,
        "wishlistCount": outcome.count,
    }))
}

/// Remove a product from a customer's wishlist.
///
/// # Errors
///
/// Returns `CliError` on invalid ids, configuration, a missing product or
/// Shopify failure.
pub async fn remove(customer: &str, product: &str) -> Result<(), CliError> {
    let customer = CustomerId::parse(customer)?;
    let product = ProductId::parse(product)?;
    let client = client()?;

    let outcome = WishlistService::new(&client)
        .remove(&customer, &product)
        .await?;
    tracing::info!(channel = %outcome.channel, removed = outcome.removed, "Wishlist written");

    print(&json!({
        "customerId": customer.bare(),
        "productId": product.bare(),
        "wishlistCount": outcome.count,
    }))
}
