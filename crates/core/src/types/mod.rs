//! Core types for the wishlist.
//!
//! This module provides type-safe wrappers for the domain concepts that cross
//! the Shopify boundary.

pub mod gid;
pub mod metafield;
pub mod wishlist;

pub use gid::*;
pub use metafield::*;
pub use wishlist::{ADDED_FROM, DecodedWishlist, DuplicateEntry, Wishlist, WishlistEntry};
