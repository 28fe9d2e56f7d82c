//! Pineapple Wishlist Core - Shared types library.
//!
//! This crate provides the types used by every wishlist component:
//! - `server` - The wishlist HTTP API
//! - `cli` - Operator tooling for inspecting and repairing wishlists
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The wishlist
//! itself lives in a Shopify customer metafield; this crate knows how to
//! address it and how to (de)serialize it, never how to fetch it.
//!
//! # Modules
//!
//! - [`types`] - Shopify global ids, wishlist entries, metafield coordinates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
