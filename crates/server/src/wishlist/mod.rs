//! Wishlist persistence and operations.
//!
//! # Flow
//!
//! Every operation runs one read-modify-write cycle:
//!
//! 1. [`MetafieldSync::read`] fetches the customer's metafield fresh (no cache)
//! 2. [`WishlistService`] mutates the in-memory [`Wishlist`](wishlist_core::Wishlist)
//! 3. [`MetafieldSync::write`] stores the whole list back, GraphQL first and
//!    REST as fallback
//!
//! There is no locking around the cycle. Shopify offers no conditional write
//! for metafields, so concurrent writers for the same customer race and the
//! last write wins.

mod products;
mod service;
mod sync;

pub use products::{ProductLookup, ProductSummary};
pub use service::{AddOutcome, RemoveOutcome, WishlistError, WishlistService};
pub use sync::{MetafieldSync, WishlistRead, WriteChannel};
