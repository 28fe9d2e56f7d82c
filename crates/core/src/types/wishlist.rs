//! The wishlist stored in a customer metafield.
//!
//! The whole list is one JSON array; there is no per-entry storage. Entries
//! keep insertion order and product ids are unique within a list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::gid::{ProductId, RawId, bare_of};

/// Provenance tag written into every entry created by this service.
pub const ADDED_FROM: &str = "wishlist_api";

/// A product saved to a customer's wishlist.
///
/// Entries are immutable once created; removal deletes them. Decoding is
/// lenient so entries written by other clients survive a read-modify-write:
/// numeric ids become strings, a missing title becomes `Product <id>` and a
/// missing or unreadable `addedAt` becomes the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredEntry")]
pub struct WishlistEntry {
    /// Bare Shopify product id.
    pub id: String,
    /// Product handle, if the product lookup succeeded.
    pub handle: Option<String>,
    /// Product title (or a synthesized `Product <id>` placeholder).
    pub title: String,
    /// When the entry was added.
    pub added_at: DateTime<Utc>,
    /// Where the entry was added from.
    pub added_from: String,
}

/// Shape accepted when reading an entry back from the metafield.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    #[serde(alias = "productId")]
    id: RawId,
    #[serde(default)]
    handle: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    added_at: Option<DateTime<Utc>>,
    #[serde(default)]
    added_from: Option<String>,
}

impl From<StoredEntry> for WishlistEntry {
    fn from(stored: StoredEntry) -> Self {
        let id = stored.id.into_string();
        let title = stored
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| format!("Product {}", bare_of(&id)));

        Self {
            id,
            handle: stored.handle,
            title,
            added_at: stored.added_at.unwrap_or_default(),
            added_from: stored.added_from.unwrap_or_else(|| ADDED_FROM.to_string()),
        }
    }
}

/// RFC 3339 strings or JavaScript millisecond timestamps; anything else is
/// treated as missing.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|at| at.with_timezone(&Utc)),
        Value::Number(millis) => millis.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

impl WishlistEntry {
    /// Create an entry for `product` stamped with the current time.
    #[must_use]
    pub fn new(product: &ProductId, handle: Option<String>, title: String) -> Self {
        Self {
            id: product.bare().to_string(),
            handle,
            title,
            added_at: Utc::now(),
            added_from: ADDED_FROM.to_string(),
        }
    }

    /// Whether this entry refers to `product`.
    ///
    /// Stored ids are normally bare, but qualified ids written by older
    /// clients compare equal too.
    #[must_use]
    pub fn is_product(&self, product: &ProductId) -> bool {
        ProductId::parse(&self.id).is_ok_and(|id| &id == product)
    }
}

/// Attempted to add a product that is already on the list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("product {0} is already in the wishlist")]
pub struct DuplicateEntry(pub String);

/// A customer's wishlist, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Wishlist(Vec<WishlistEntry>);

/// A wishlist decoded from the stored metafield value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedWishlist {
    pub wishlist: Wishlist,
    /// Array items dropped because they carry no usable product id.
    pub skipped: usize,
}

impl Wishlist {
    /// Create an empty wishlist.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Decode the JSON value stored in the metafield.
    ///
    /// Items are decoded one by one; an item without a usable id is skipped
    /// and counted instead of failing the whole list.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the value is not valid JSON or not
    /// an array.
    pub fn from_json_value(value: &str) -> Result<DecodedWishlist, serde_json::Error> {
        let items: Vec<Value> = serde_json::from_str(value)?;
        let total = items.len();
        let entries: Vec<WishlistEntry> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<WishlistEntry>(item).ok())
            .filter(|entry| !entry.id.trim().is_empty())
            .collect();

        Ok(DecodedWishlist {
            skipped: total - entries.len(),
            wishlist: Self(entries),
        })
    }

    /// Serialize to the JSON value written into the metafield.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Whether an entry for `product` exists.
    #[must_use]
    pub fn contains(&self, product: &ProductId) -> bool {
        self.0.iter().any(|entry| entry.is_product(product))
    }

    /// Append an entry, rejecting duplicates.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEntry` if an entry with the same product id exists.
    pub fn push(&mut self, entry: WishlistEntry) -> Result<(), DuplicateEntry> {
        let duplicate = ProductId::parse(&entry.id).is_ok_and(|id| self.contains(&id))
            || self.0.iter().any(|existing| existing.id == entry.id);
        if duplicate {
            return Err(DuplicateEntry(entry.id));
        }
        self.0.push(entry);
        Ok(())
    }

    /// Remove every entry for `product`, returning how many were removed.
    pub fn remove(&mut self, product: &ProductId) -> usize {
        let before = self.0.len();
        self.0.retain(|entry| !entry.is_product(product));
        before - self.0.len()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the wishlist has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, WishlistEntry> {
        self.0.iter()
    }

    /// Consume the wishlist and return its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<WishlistEntry> {
        self.0
    }
}

impl From<Vec<WishlistEntry>> for Wishlist {
    fn from(entries: Vec<WishlistEntry>) -> Self {
        Self(entries)
    }
}

impl<'a> IntoIterator for &'a Wishlist {
    type Item = &'a WishlistEntry;
    type IntoIter = std::slice::Iter<'a, WishlistEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
