//! Pineapple wishlist server library.
//!
//! Per-customer wishlists stored as a JSON array in a Shopify customer
//! metafield (`custom.wishlist_products`), exposed as a small JSON API for
//! the storefront. Built as a library so the router can be tested in-process
//! and the operations reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;
pub mod wishlist;
