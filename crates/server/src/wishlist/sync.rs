//! Read and write the wishlist metafield.

use std::fmt;

use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};
use wishlist_core::{
    CustomerId, DecodedWishlist, WISHLIST_KEY, WISHLIST_METAFIELD_TYPE, WISHLIST_NAMESPACE,
    Wishlist,
};

use crate::shopify::queries::{
    CUSTOMER_WISHLIST, CustomerWishlistData, MetafieldsSetData, WISHLIST_METAFIELDS_SET,
    customer_wishlist_variables, metafields_set_variables,
};
use crate::shopify::{RestMethod, ShopifyApi, ShopifyError, query_as};

/// Outcome of reading a customer's wishlist.
///
/// Keeps "never created" and "stored but unreadable" apart for logging even
/// though both behave as an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistRead {
    /// The metafield exists and parsed.
    Stored(Wishlist),
    /// No wishlist metafield (or no such customer).
    Absent {
        /// Whether the customer record itself was found.
        customer_found: bool,
    },
    /// The metafield exists but its value is not a JSON array.
    Recovered {
        /// Parse error description.
        reason: String,
    },
}

impl WishlistRead {
    /// The wishlist to operate on; absent and unreadable values are empty.
    #[must_use]
    pub fn into_wishlist(self) -> Wishlist {
        match self {
            Self::Stored(wishlist) => wishlist,
            Self::Absent { .. } | Self::Recovered { .. } => Wishlist::new(),
        }
    }
}

/// Channel used to persist the wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteChannel {
    /// `metafieldsSet` GraphQL mutation.
    Graphql,
    /// Customer metafields REST endpoints.
    Rest,
}

impl WriteChannel {
    /// Channels in the order they are attempted.
    pub const FALLBACK_ORDER: [Self; 2] = [Self::Graphql, Self::Rest];

    /// Channel name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Graphql => "graphql",
            Self::Rest => "rest",
        }
    }
}

impl fmt::Display for WriteChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronizes a customer's wishlist with its Shopify metafield.
pub struct MetafieldSync<'a, C> {
    client: &'a C,
}

impl<'a, C: ShopifyApi> MetafieldSync<'a, C> {
    /// Create a synchronizer over `client`.
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Fetch the customer's wishlist.
    ///
    /// A missing customer, a missing metafield and an unparseable value all
    /// yield an empty wishlist; only transport/API failures are errors.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` if the customer query fails.
    #[instrument(skip(self), fields(customer_id = %customer.bare()))]
    pub async fn read(&self, customer: &CustomerId) -> Result<WishlistRead, ShopifyError> {
        let data: CustomerWishlistData = query_as(
            self.client,
            &CUSTOMER_WISHLIST,
            customer_wishlist_variables(customer),
        )
        .await?;

        let Some(node) = data.customer else {
            debug!("Customer not found, wishlist is empty");
            return Ok(WishlistRead::Absent {
                customer_found: false,
            });
        };

        let Some(metafield) = node.wishlist_metafield() else {
            debug!("Customer has no wishlist metafield yet");
            return Ok(WishlistRead::Absent {
                customer_found: true,
            });
        };

        match Wishlist::from_json_value(&metafield.value) {
            Ok(DecodedWishlist { wishlist, skipped }) => {
                if skipped > 0 {
                    warn!(
                        skipped,
                        metafield_id = %metafield.id,
                        "Dropped stored wishlist items without a product id"
                    );
                }
                debug!(count = wishlist.len(), "Loaded wishlist");
                Ok(WishlistRead::Stored(wishlist))
            }
            Err(e) => {
                warn!(
                    error = %e,
                    metafield_id = %metafield.id,
                    "Stored wishlist is not a JSON array, treating as empty"
                );
                Ok(WishlistRead::Recovered {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Store the whole wishlist, trying each [`WriteChannel`] in order.
    ///
    /// Returns the channel that succeeded.
    ///
    /// # Errors
    ///
    /// Returns the last channel's error when every channel fails.
    #[instrument(skip(self, wishlist), fields(customer_id = %customer.bare(), count = wishlist.len()))]
    pub async fn write(
        &self,
        customer: &CustomerId,
        wishlist: &Wishlist,
    ) -> Result<WriteChannel, ShopifyError> {
        let value = wishlist.to_json_value()?;
        let mut last_error = None;

        for channel in WriteChannel::FALLBACK_ORDER {
            match self.write_via(channel, customer, &value).await {
                Ok(()) => {
                    if last_error.is_some() {
                        info!(channel = %channel, "Wishlist written via fallback channel");
                    } else {
                        debug!(channel = %channel, "Wishlist written");
                    }
                    return Ok(channel);
                }
                Err(e) => {
                    warn!(channel = %channel, error = %e, "Wishlist write failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(ShopifyError::MissingData("write channel")))
    }

    async fn write_via(
        &self,
        channel: WriteChannel,
        customer: &CustomerId,
        value: &str,
    ) -> Result<(), ShopifyError> {
        match channel {
            WriteChannel::Graphql => self.write_graphql(customer, value).await,
            WriteChannel::Rest => self.write_rest(customer, value).await,
        }
    }

    async fn write_graphql(&self, customer: &CustomerId, value: &str) -> Result<(), ShopifyError> {
        let data: MetafieldsSetData = query_as(
            self.client,
            &WISHLIST_METAFIELDS_SET,
            metafields_set_variables(customer, value),
        )
        .await?;

        let payload = data
            .metafields_set
            .ok_or(ShopifyError::MissingData("metafieldsSet"))?;

        if !payload.user_errors.is_empty() {
            return Err(ShopifyError::UserErrors(payload.user_errors));
        }

        Ok(())
    }

    async fn write_rest(&self, customer: &CustomerId, value: &str) -> Result<(), ShopifyError> {
        let bare = customer.bare();
        let lookup_path = format!(
            "customers/{bare}/metafields.json?namespace={WISHLIST_NAMESPACE}&key={WISHLIST_KEY}"
        );

        let existing = self
            .client
            .rest_read(&lookup_path)
            .await?
            .as_ref()
            .and_then(existing_metafield_id);

        match existing {
            Some(id) => {
                let body = json!({
                    "metafield": {
                        "id": id,
                        "namespace": WISHLIST_NAMESPACE,
                        "key": WISHLIST_KEY,
                        "type": WISHLIST_METAFIELD_TYPE,
                        "value": value,
                    }
                });
                self.client
                    .rest_write(
                        &format!("customers/{bare}/metafields/{id}.json"),
                        RestMethod::Put,
                        body,
                    )
                    .await?;
            }
            None => {
                let body = json!({
                    "metafield": {
                        "namespace": WISHLIST_NAMESPACE,
                        "key": WISHLIST_KEY,
                        "type": WISHLIST_METAFIELD_TYPE,
                        "value": value,
                    }
                });
                self.client
                    .rest_write(
                        &format!("customers/{bare}/metafields.json"),
                        RestMethod::Post,
                        body,
                    )
                    .await?;
            }
        }

        Ok(())
    }
}

/// Id of the wishlist metafield in a REST `metafields` listing.
///
/// The listing is already filtered by namespace and key; records that say
/// otherwise are skipped, and a record without those fields is trusted.
fn existing_metafield_id(listing: &Value) -> Option<String> {
    let records = listing.get("metafields")?.as_array()?;
    let record = records.iter().find(|m| {
        let matches = |field: &str, expected: &str| {
            m.get(field)
                .and_then(Value::as_str)
                .is_none_or(|actual| actual == expected)
        };
        matches("namespace", WISHLIST_NAMESPACE) && matches("key", WISHLIST_KEY)
    })?;

    match record.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wishlist_core::{ProductId, WishlistEntry};

    use super::*;
    use crate::shopify::testing::{Call, FakeShopify};

    fn customer(id: &str) -> CustomerId {
        CustomerId::parse(id).unwrap()
    }

    fn sample_wishlist() -> Wishlist {
        let product = ProductId::parse("501").unwrap();
        Wishlist::from(vec![WishlistEntry::new(
            &product,
            Some("linen-shirt".to_string()),
            "Linen Shirt".to_string(),
        )])
    }

    #[tokio::test]
    async fn read_unknown_customer_is_absent() {
        let fake = FakeShopify::new();
        let read = MetafieldSync::new(&fake).read(&customer("1")).await.unwrap();
        assert_eq!(
            read,
            WishlistRead::Absent {
                customer_found: false
            }
        );
        assert!(read.into_wishlist().is_empty());
    }

    #[tokio::test]
    async fn read_customer_without_metafield_is_absent() {
        let fake = FakeShopify::with_customer("1");
        let read = MetafieldSync::new(&fake).read(&customer("1")).await.unwrap();
        assert_eq!(
            read,
            WishlistRead::Absent {
                customer_found: true
            }
        );
    }

    #[tokio::test]
    async fn read_keeps_entries_written_by_other_clients() {
        let fake = FakeShopify::new();
        fake.seed_value(
            "1",
            r#"[{"id":555,"handle":"a","addedAt":"2025-01-01T00:00:00.000Z"},{"title":"no id"}]"#,
        );

        let read = MetafieldSync::new(&fake).read(&customer("1")).await.unwrap();
        assert!(matches!(read, WishlistRead::Stored(_)));
        let wishlist = read.into_wishlist();
        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.contains(&ProductId::parse("555").unwrap()));
    }

    #[tokio::test]
    async fn read_corrupted_value_recovers_as_empty() {
        let fake = FakeShopify::new();
        fake.seed_value("1", "{not json");

        let read = MetafieldSync::new(&fake).read(&customer("1")).await.unwrap();
        assert!(matches!(read, WishlistRead::Recovered { .. }));
        assert!(read.into_wishlist().is_empty());
    }

    #[tokio::test]
    async fn read_propagates_query_failure() {
        let fake = FakeShopify::with_customer("1");
        fake.state().fail_read = true;

        let err = MetafieldSync::new(&fake).read(&customer("1")).await.unwrap_err();
        assert!(matches!(err, ShopifyError::GraphQL(_)));
    }

    #[tokio::test]
    async fn bare_and_qualified_ids_read_the_same_list() {
        let fake = FakeShopify::new();
        fake.seed_value("123", &sample_wishlist().to_json_value().unwrap());
        let sync = MetafieldSync::new(&fake);

        let bare = sync.read(&customer("123")).await.unwrap();
        let qualified = sync
            .read(&customer("gid://shopify/Customer/123"))
            .await
            .unwrap();
        assert_eq!(bare, qualified);
        assert_eq!(bare.into_wishlist().len(), 1);
    }

    #[tokio::test]
    async fn write_prefers_graphql() {
        let fake = FakeShopify::with_customer("1");
        let channel = MetafieldSync::new(&fake)
            .write(&customer("1"), &sample_wishlist())
            .await
            .unwrap();

        assert_eq!(channel, WriteChannel::Graphql);
        assert_eq!(fake.calls(), vec![Call::Graphql("WishlistMetafieldsSet")]);
        assert_eq!(fake.stored_wishlist("1"), sample_wishlist());
    }

    #[tokio::test]
    async fn user_errors_fall_back_to_rest_create() {
        let fake = FakeShopify::with_customer("1");
        fake.state().user_errors_on_write = true;

        let channel = MetafieldSync::new(&fake)
            .write(&customer("1"), &sample_wishlist())
            .await
            .unwrap();

        assert_eq!(channel, WriteChannel::Rest);
        assert_eq!(
            fake.calls(),
            vec![
                Call::Graphql("WishlistMetafieldsSet"),
                Call::RestRead(
                    "customers/1/metafields.json?namespace=custom&key=wishlist_products"
                        .to_string()
                ),
                Call::RestWrite(RestMethod::Post, "customers/1/metafields.json".to_string()),
            ]
        );
        assert_eq!(fake.stored_wishlist("1"), sample_wishlist());
    }

    #[tokio::test]
    async fn graphql_failure_falls_back_to_rest_update() {
        let fake = FakeShopify::new();
        fake.seed_value("1", "[]");
        fake.state().fail_graphql_write = true;

        let channel = MetafieldSync::new(&fake)
            .write(&customer("gid://shopify/Customer/1"), &sample_wishlist())
            .await
            .unwrap();

        assert_eq!(channel, WriteChannel::Rest);
        assert!(
            fake.calls()
                .contains(&Call::RestWrite(RestMethod::Put, "customers/1/metafields/1.json".to_string()))
        );
        assert_eq!(fake.stored_wishlist("1"), sample_wishlist());
    }

    #[tokio::test]
    async fn rest_failure_after_graphql_failure_propagates() {
        let fake = FakeShopify::with_customer("1");
        {
            let mut state = fake.state();
            state.fail_graphql_write = true;
            state.fail_rest_write = true;
        }

        let err = MetafieldSync::new(&fake)
            .write(&customer("1"), &sample_wishlist())
            .await
            .unwrap_err();

        assert!(matches!(err, ShopifyError::Status { status: 500, .. }));
        assert_eq!(fake.stored_value("1"), None);
    }

    #[test]
    fn existing_metafield_id_matches_namespace_and_key() {
        let listing = json!({
            "metafields": [
                { "id": 7, "namespace": "custom", "key": "other" },
                { "id": 9, "namespace": "custom", "key": "wishlist_products" }
            ]
        });
        assert_eq!(existing_metafield_id(&listing), Some("9".to_string()));
        assert_eq!(existing_metafield_id(&json!({ "metafields": [] })), None);
        assert_eq!(existing_metafield_id(&json!({})), None);
    }
}
