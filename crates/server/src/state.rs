//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WishlistConfig;
use crate::shopify::{AdminClient, ShopifyApi};
use crate::wishlist::WishlistService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It is generic over the Shopify
/// client so routers can be built over an in-memory client in tests.
pub struct AppState<C = AdminClient> {
    inner: Arc<AppStateInner<C>>,
}

struct AppStateInner<C> {
    config: WishlistConfig,
    shopify: C,
}

// Manual impl: `C` itself does not need to be `Clone`.
impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AppState<AdminClient> {
    /// Create application state with a live Admin API client.
    #[must_use]
    pub fn new(config: WishlistConfig) -> Self {
        let shopify = AdminClient::new(&config.shopify);
        Self::with_client(config, shopify)
    }
}

impl<C: ShopifyApi> AppState<C> {
    /// Create application state over an existing client.
    #[must_use]
    pub fn with_client(config: WishlistConfig, shopify: C) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, shopify }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &WishlistConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify client.
    #[must_use]
    pub fn shopify(&self) -> &C {
        &self.inner.shopify
    }

    /// Wishlist operations backed by this state's client.
    #[must_use]
    pub fn wishlist(&self) -> WishlistService<'_, C> {
        WishlistService::new(&self.inner.shopify)
    }
}
