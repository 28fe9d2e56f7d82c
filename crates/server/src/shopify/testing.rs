//! In-memory Shopify fake for unit and router tests.
//!
//! Understands the three GraphQL documents in [`super::queries`] and the
//! customer metafield REST paths. Failures are scriptable per channel and
//! every call is recorded so tests can assert which channel was used.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use serde_json::{Value, json};
use wishlist_core::types::gid::bare_of;
use wishlist_core::{WISHLIST_KEY, WISHLIST_NAMESPACE, Wishlist};

use super::queries::{CUSTOMER_WISHLIST, PRODUCTS_BY_IDS, WISHLIST_METAFIELDS_SET};
use super::{GraphQLDocument, GraphQLError, RestMethod, ShopifyApi, ShopifyError};

/// A recorded call against the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Graphql(&'static str),
    RestRead(String),
    RestWrite(RestMethod, String),
}

#[derive(Debug, Clone)]
pub struct StoredMetafield {
    pub id: u64,
    pub value: String,
}

/// Mutable state behind the fake.
#[derive(Debug, Default)]
pub struct FakeState {
    pub customers: HashSet<String>,
    pub metafields: HashMap<String, StoredMetafield>,
    pub products: HashMap<String, (String, String)>,
    pub fail_read: bool,
    pub fail_graphql_write: bool,
    pub user_errors_on_write: bool,
    pub fail_rest_write: bool,
    pub fail_product_lookup: bool,
    pub calls: Vec<Call>,
    next_metafield_id: u64,
}

impl FakeState {
    fn upsert(&mut self, customer: &str, value: String) -> u64 {
        if let Some(existing) = self.metafields.get_mut(customer) {
            existing.value = value;
            return existing.id;
        }
        self.next_metafield_id += 1;
        let id = self.next_metafield_id;
        self.metafields
            .insert(customer.to_string(), StoredMetafield { id, value });
        id
    }
}

#[derive(Debug, Default)]
pub struct FakeShopify {
    state: Mutex<FakeState>,
}

impl FakeShopify {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fake with one existing customer (bare id).
    pub fn with_customer(customer: &str) -> Self {
        let fake = Self::new();
        fake.state().customers.insert(customer.to_string());
        fake
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state poisoned")
    }

    pub fn add_product(&self, id: &str, handle: &str, title: &str) {
        self.state()
            .products
            .insert(id.to_string(), (handle.to_string(), title.to_string()));
    }

    /// Store a raw metafield value for a customer.
    pub fn seed_value(&self, customer: &str, raw: &str) {
        let mut state = self.state();
        state.customers.insert(customer.to_string());
        state.upsert(customer, raw.to_string());
    }

    pub fn stored_value(&self, customer: &str) -> Option<String> {
        self.state().metafields.get(customer).map(|m| m.value.clone())
    }

    pub fn stored_wishlist(&self, customer: &str) -> Wishlist {
        self.stored_value(customer)
            .map(|raw| Wishlist::from_json_value(&raw).unwrap().wishlist)
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    fn handle_graphql(
        &self,
        document: &GraphQLDocument,
        variables: &Value,
    ) -> Result<Value, ShopifyError> {
        let mut state = self.state();
        state.calls.push(Call::Graphql(document.operation_name));

        if *document == CUSTOMER_WISHLIST {
            if state.fail_read {
                return Err(graphql_error("Throttled"));
            }
            let customer = bare_of(variables["id"].as_str().unwrap_or_default()).to_string();
            if !state.customers.contains(&customer) {
                return Ok(json!({ "customer": null }));
            }
            let nodes: Vec<Value> = state
                .metafields
                .get(&customer)
                .map(|m| {
                    json!({
                        "id": format!("gid://shopify/Metafield/{}", m.id),
                        "namespace": WISHLIST_NAMESPACE,
                        "key": WISHLIST_KEY,
                        "value": m.value,
                        "type": "json",
                    })
                })
                .into_iter()
                .collect();
            return Ok(json!({
                "customer": {
                    "id": format!("gid://shopify/Customer/{customer}"),
                    "metafields": { "nodes": nodes },
                }
            }));
        }

        if *document == WISHLIST_METAFIELDS_SET {
            if state.fail_graphql_write {
                return Err(graphql_error("Access denied for metafieldsSet field"));
            }
            if state.user_errors_on_write {
                return Ok(json!({
                    "metafieldsSet": {
                        "metafields": [],
                        "userErrors": [{
                            "field": ["metafields", "0", "value"],
                            "message": "Owner type is not permitted",
                            "code": "INVALID_TYPE",
                        }],
                    }
                }));
            }
            let input = &variables["metafields"][0];
            let customer = bare_of(input["ownerId"].as_str().unwrap_or_default()).to_string();
            let value = input["value"].as_str().unwrap_or_default().to_string();
            state.customers.insert(customer.clone());
            let id = state.upsert(&customer, value);
            return Ok(json!({
                "metafieldsSet": {
                    "metafields": [{
                        "id": format!("gid://shopify/Metafield/{id}"),
                        "namespace": WISHLIST_NAMESPACE,
                        "key": WISHLIST_KEY,
                    }],
                    "userErrors": [],
                }
            }));
        }

        if *document == PRODUCTS_BY_IDS {
            if state.fail_product_lookup {
                return Err(graphql_error("Internal error looking up products"));
            }
            let nodes: Vec<Value> = variables["ids"]
                .as_array()
                .map(Vec::as_slice)
                .unwrap_or_default()
                .iter()
                .map(|id| {
                    let qualified = id.as_str().unwrap_or_default();
                    state.products.get(bare_of(qualified)).map_or(Value::Null, |(handle, title)| {
                        json!({ "id": qualified, "handle": handle, "title": title })
                    })
                })
                .collect();
            return Ok(json!({ "nodes": nodes }));
        }

        Err(graphql_error("unknown operation"))
    }
}

fn graphql_error(message: &str) -> ShopifyError {
    ShopifyError::GraphQL(vec![GraphQLError {
        message: message.to_string(),
        locations: vec![],
        path: vec![],
    }])
}

/// Bare customer id from `customers/{id}/metafields...`.
fn customer_from_path(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .nth(1)
        .unwrap_or_default()
        .to_string()
}

impl ShopifyApi for FakeShopify {
    async fn graphql(
        &self,
        document: &GraphQLDocument,
        variables: Value,
    ) -> Result<Value, ShopifyError> {
        self.handle_graphql(document, &variables)
    }

    async fn rest_read(&self, path: &str) -> Result<Option<Value>, ShopifyError> {
        let mut state = self.state();
        state.calls.push(Call::RestRead(path.to_string()));

        let customer = customer_from_path(path);
        if !state.customers.contains(&customer) {
            return Ok(None);
        }
        let metafields: Vec<Value> = state
            .metafields
            .get(&customer)
            .map(|m| {
                json!({
                    "id": m.id,
                    "namespace": WISHLIST_NAMESPACE,
                    "key": WISHLIST_KEY,
                    "value": m.value,
                    "type": "json",
                })
            })
            .into_iter()
            .collect();
        Ok(Some(json!({ "metafields": metafields })))
    }

    async fn rest_write(
        &self,
        path: &str,
        method: RestMethod,
        body: Value,
    ) -> Result<Value, ShopifyError> {
        let mut state = self.state();
        state.calls.push(Call::RestWrite(method, path.to_string()));

        if state.fail_rest_write {
            return Err(ShopifyError::Status {
                status: 500,
                body: "{\"errors\":\"Internal Server Error\"}".to_string(),
            });
        }

        let customer = customer_from_path(path);
        let value = body["metafield"]["value"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        state.customers.insert(customer.clone());
        let id = state.upsert(&customer, value.clone());
        Ok(json!({ "metafield": { "id": id, "value": value } }))
    }
}
