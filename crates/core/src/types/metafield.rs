//! Coordinates of the customer metafield holding the wishlist.

/// Metafield namespace the wishlist is stored under.
pub const WISHLIST_NAMESPACE: &str = "custom";

/// Metafield key the wishlist is stored under.
pub const WISHLIST_KEY: &str = "wishlist_products";

/// Shopify metafield type of the stored value.
pub const WISHLIST_METAFIELD_TYPE: &str = "json";

/// Number of namespace metafields fetched when locating the wishlist.
pub const METAFIELD_PAGE_SIZE: i64 = 10;
