//! Shopify global ids with bare/qualified normalization.
//!
//! Shopify addresses resources as `gid://shopify/<Resource>/<id>`, while
//! storefront themes usually only know the trailing numeric id. Every id that
//! enters the system is normalized to the qualified form so that `"123"` and
//! `"gid://shopify/Customer/123"` address the same customer.
//!
//! Use the `define_gid!` macro to create a type-safe wrapper per resource so
//! customer and product ids cannot be mixed up.

use serde::Deserialize;
use thiserror::Error;

/// Prefix shared by every qualified Shopify id.
pub const GID_PREFIX: &str = "gid://";

/// Errors that can occur when parsing a Shopify global id.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GidError {
    /// The input string is empty (or only whitespace).
    #[error("id cannot be empty")]
    Empty,
    /// The qualified id has no trailing id segment.
    #[error("id `{0}` has no resource id segment")]
    MissingId(String),
    /// A bare id contains characters that cannot appear in a gid segment.
    #[error("id `{0}` is not a valid bare id")]
    Malformed(String),
}

/// Normalize `input` into a qualified gid for `resource`.
///
/// Qualified input is kept as-is; bare input is prefixed with
/// `gid://shopify/<resource>/`.
///
/// # Errors
///
/// Returns `GidError` if the input is empty, a qualified id lacks its
/// trailing segment, or a bare id contains `/` or whitespace.
pub fn qualify(input: &str, resource: &str) -> Result<String, GidError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(GidError::Empty);
    }

    if trimmed.starts_with(GID_PREFIX) {
        if bare_of(trimmed).is_empty() {
            return Err(GidError::MissingId(trimmed.to_owned()));
        }
        return Ok(trimmed.to_owned());
    }

    if trimmed.contains('/') || trimmed.chars().any(char::is_whitespace) {
        return Err(GidError::Malformed(trimmed.to_owned()));
    }

    Ok(format!("{GID_PREFIX}shopify/{resource}/{trimmed}"))
}

/// Return the trailing id segment of a qualified gid.
#[must_use]
pub fn bare_of(qualified: &str) -> &str {
    qualified.rsplit('/').next().unwrap_or(qualified)
}

/// An id as it appears in JSON input.
///
/// Storefront themes render `{{ customer.id }}` as a number, and older
/// wishlist writers stored product ids the same way.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    /// The id as a string, ready for [`qualify`].
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Macro to define a type-safe Shopify gid wrapper.
///
/// Creates a newtype around the qualified id string with:
/// - `parse()` applying the bare/qualified normalization
/// - `qualified()` and `bare()` accessors
/// - `Display` (qualified form) and `FromStr`
/// - `Serialize`/`Deserialize` as a string, normalizing on the way in
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash` on the normalized value
///
/// # Example
///
/// ```rust
/// # use wishlist_core::define_gid;
/// define_gid!(OrderId, "Order");
///
/// let a = OrderId::parse("42").unwrap();
/// let b = OrderId::parse("gid://shopify/Order/42").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.bare(), "42");
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Shopify resource name used when qualifying bare ids.
            pub const RESOURCE: &'static str = $resource;

            /// Parse a bare or qualified id.
            ///
            /// # Errors
            ///
            /// Returns `GidError` if the input cannot be normalized.
            pub fn parse(input: &str) -> ::core::result::Result<Self, $crate::GidError> {
                $crate::types::gid::qualify(input, $resource).map(Self)
            }

            /// The fully qualified gid (`gid://shopify/...`).
            #[must_use]
            pub fn qualified(&self) -> &str {
                &self.0
            }

            /// The trailing id segment.
            #[must_use]
            pub fn bare(&self) -> &str {
                $crate::types::gid::bare_of(&self.0)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::GidError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::core::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::core::result::Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::parse(&raw).map_err(<D::Error as ::serde::de::Error>::custom)
            }
        }
    };
}

define_gid!(CustomerId, "Customer");
define_gid!(ProductId, "Product");
