//! Add, list and remove wishlist entries.

use thiserror::Error;
use tracing::{info, instrument};
use wishlist_core::{CustomerId, ProductId, Wishlist, WishlistEntry};

use super::products::ProductLookup;
use super::sync::{MetafieldSync, WriteChannel};
use crate::shopify::{ShopifyApi, ShopifyError};

/// Errors from wishlist operations.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// The product is already on the customer's list.
    #[error("Product is already in wishlist")]
    Conflict(ProductId),

    /// The product is not on the customer's list.
    #[error("Product not found in wishlist")]
    NotFound(ProductId),

    /// Reading or writing the metafield failed.
    #[error(transparent)]
    Remote(#[from] ShopifyError),
}

/// Result of a successful add.
#[derive(Debug, Clone)]
pub struct AddOutcome {
    /// The stored entry.
    pub entry: WishlistEntry,
    /// List length after the add.
    pub count: usize,
    /// Channel that stored the list.
    pub channel: WriteChannel,
}

/// Result of a successful remove.
#[derive(Debug, Clone, Copy)]
pub struct RemoveOutcome {
    /// Number of entries removed.
    pub removed: usize,
    /// List length after the remove.
    pub count: usize,
    /// Channel that stored the list.
    pub channel: WriteChannel,
}

/// Wishlist operations for one request.
///
/// Borrows the Shopify client from application state; construct per request.
pub struct WishlistService<'a, C> {
    sync: MetafieldSync<'a, C>,
    products: ProductLookup<'a, C>,
}

impl<'a, C: ShopifyApi> WishlistService<'a, C> {
    /// Create a service over `client`.
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self {
            sync: MetafieldSync::new(client),
            products: ProductLookup::new(client),
        }
    }

    /// Add a product to the customer's wishlist.
    ///
    /// Product details are looked up for display; a failed lookup still adds
    /// the entry with placeholder details.
    ///
    /// # Errors
    ///
    /// - [`WishlistError::Conflict`] if the product is already present
    /// - [`WishlistError::Remote`] if the read or every write channel fails
    #[instrument(skip(self), fields(customer_id = %customer.bare(), product_id = %product.bare()))]
    pub async fn add(
        &self,
        customer: &CustomerId,
        product: &ProductId,
    ) -> Result<AddOutcome, WishlistError> {
        let mut wishlist = self.sync.read(customer).await?.into_wishlist();

        if wishlist.contains(product) {
            return Err(WishlistError::Conflict(product.clone()));
        }

        let summary = self.products.resolve_one(product).await;
        let entry = WishlistEntry::new(product, summary.handle, summary.title);

        wishlist
            .push(entry.clone())
            .map_err(|_| WishlistError::Conflict(product.clone()))?;

        let channel = self.sync.write(customer, &wishlist).await?;

        info!(count = wishlist.len(), channel = %channel, "Added product to wishlist");

        Ok(AddOutcome {
            entry,
            count: wishlist.len(),
            channel,
        })
    }

    /// The customer's wishlist; empty if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::Remote`] if the read fails.
    #[instrument(skip(self), fields(customer_id = %customer.bare()))]
    pub async fn get(&self, customer: &CustomerId) -> Result<Wishlist, WishlistError> {
        Ok(self.sync.read(customer).await?.into_wishlist())
    }

    /// Remove a product from the customer's wishlist.
    ///
    /// # Errors
    ///
    /// - [`WishlistError::NotFound`] if the product is absent (nothing is written)
    /// - [`WishlistError::Remote`] if the read or every write channel fails
    #[instrument(skip(self), fields(customer_id = %customer.bare(), product_id = %product.bare()))]
    pub async fn remove(
        &self,
        customer: &CustomerId,
        product: &ProductId,
    ) -> Result<RemoveOutcome, WishlistError> {
        let mut wishlist = self.sync.read(customer).await?.into_wishlist();

        let removed = wishlist.remove(product);
        if removed == 0 {
            return Err(WishlistError::NotFound(product.clone()));
        }

        let channel = self.sync.write(customer, &wishlist).await?;

        info!(removed, count = wishlist.len(), channel = %channel, "Removed product from wishlist");

        Ok(RemoveOutcome {
            removed,
            count: wishlist.len(),
            channel,
        })
    }
}
