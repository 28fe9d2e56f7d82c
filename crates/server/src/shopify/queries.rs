//! GraphQL documents for the Shopify Admin API and their response shapes.
//!
//! Documents are sent through `graphql_client::QueryBody`; responses are
//! decoded from the `data` object into the structs below.

use serde::Deserialize;
use serde_json::{Value, json};
use wishlist_core::{
    CustomerId, METAFIELD_PAGE_SIZE, ProductId, WISHLIST_KEY, WISHLIST_METAFIELD_TYPE,
    WISHLIST_NAMESPACE,
};

use super::UserError;

/// A named GraphQL operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphQLDocument {
    /// Operation name (must match the name inside `query`).
    pub operation_name: &'static str,
    /// Query or mutation text.
    pub query: &'static str,
}

// =============================================================================
// Customer metafield read
// =============================================================================

/// Fetch a customer and the metafields in the wishlist namespace.
pub const CUSTOMER_WISHLIST: GraphQLDocument = GraphQLDocument {
    operation_name: "CustomerWishlist",
    query: r"query CustomerWishlist($id: ID!, $namespace: String!, $first: Int!) {
  customer(id: $id) {
    id
    metafields(first: $first, namespace: $namespace) {
      nodes {
        id
        namespace
        key
        value
        type
      }
    }
  }
}",
};

/// Variables for [`CUSTOMER_WISHLIST`].
#[must_use]
pub fn customer_wishlist_variables(customer: &CustomerId) -> Value {
    json!({
        "id": customer.qualified(),
        "namespace": WISHLIST_NAMESPACE,
        "first": METAFIELD_PAGE_SIZE,
    })
}

/// Response data for [`CUSTOMER_WISHLIST`].
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerWishlistData {
    pub customer: Option<CustomerNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerNode {
    pub id: String,
    pub metafields: MetafieldConnection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetafieldConnection {
    #[serde(default)]
    pub nodes: Vec<MetafieldNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetafieldNode {
    pub id: String,
    pub namespace: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub metafield_type: Option<String>,
}

impl CustomerNode {
    /// The wishlist metafield, if the customer has one.
    #[must_use]
    pub fn wishlist_metafield(&self) -> Option<&MetafieldNode> {
        self.metafields
            .nodes
            .iter()
            .find(|m| m.namespace == WISHLIST_NAMESPACE && m.key == WISHLIST_KEY)
    }
}

// =============================================================================
// Customer metafield write
// =============================================================================

/// Set the wishlist metafield on a customer.
pub const WISHLIST_METAFIELDS_SET: GraphQLDocument = GraphQLDocument {
    operation_name: "WishlistMetafieldsSet",
    query: r"mutation WishlistMetafieldsSet($metafields: [MetafieldsSetInput!]!) {
  metafieldsSet(metafields: $metafields) {
    metafields {
      id
      namespace
      key
    }
    userErrors {
      field
      message
      code
    }
  }
}",
};

/// Variables for [`WISHLIST_METAFIELDS_SET`].
#[must_use]
pub fn metafields_set_variables(customer: &CustomerId, value: &str) -> Value {
    json!({
        "metafields": [{
            "ownerId": customer.qualified(),
            "namespace": WISHLIST_NAMESPACE,
            "key": WISHLIST_KEY,
            "type": WISHLIST_METAFIELD_TYPE,
            "value": value,
        }]
    })
}

/// Response data for [`WISHLIST_METAFIELDS_SET`].
#[derive(Debug, Clone, Deserialize)]
pub struct MetafieldsSetData {
    #[serde(rename = "metafieldsSet")]
    pub metafields_set: Option<MetafieldsSetPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetafieldsSetPayload {
    #[serde(rename = "userErrors", default)]
    pub user_errors: Vec<UserError>,
}

// =============================================================================
// Product lookup
// =============================================================================

/// Resolve a batch of products by qualified id.
pub const PRODUCTS_BY_IDS: GraphQLDocument = GraphQLDocument {
    operation_name: "ProductsByIds",
    query: r"query ProductsByIds($ids: [ID!]!) {
  nodes(ids: $ids) {
    ... on Product {
      id
      handle
      title
    }
  }
}",
};

/// Variables for [`PRODUCTS_BY_IDS`].
#[must_use]
pub fn products_by_ids_variables(products: &[ProductId]) -> Value {
    let ids: Vec<&str> = products.iter().map(ProductId::qualified).collect();
    json!({ "ids": ids })
}

/// Response data for [`PRODUCTS_BY_IDS`].
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsByIdsData {
    #[serde(default)]
    pub nodes: Vec<Option<ProductNode>>,
}

/// A node from `nodes(ids:)`; fields are absent for non-product nodes.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductNode {
    pub id: Option<String>,
    pub handle: Option<String>,
    pub title: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn operation_names_match_documents() {
        for doc in [CUSTOMER_WISHLIST, WISHLIST_METAFIELDS_SET, PRODUCTS_BY_IDS] {
            assert!(
                doc.query.contains(doc.operation_name),
                "{} missing from its document",
                doc.operation_name
            );
        }
    }

    #[test]
    fn customer_variables_use_qualified_id() {
        let customer = CustomerId::parse("77").unwrap();
        let vars = customer_wishlist_variables(&customer);
        assert_eq!(vars["id"], "gid://shopify/Customer/77");
        assert_eq!(vars["namespace"], "custom");
        assert_eq!(vars["first"], 10);
    }

    #[test]
    fn metafields_set_variables_carry_full_value() {
        let customer = CustomerId::parse("gid://shopify/Customer/77").unwrap();
        let vars = metafields_set_variables(&customer, "[]");
        let input = &vars["metafields"][0];
        assert_eq!(input["ownerId"], "gid://shopify/Customer/77");
        assert_eq!(input["key"], "wishlist_products");
        assert_eq!(input["type"], "json");
        assert_eq!(input["value"], "[]");
    }

    #[test]
    fn finds_wishlist_metafield_among_namespace() {
        let data: CustomerWishlistData = serde_json::from_value(json!({
            "customer": {
                "id": "gid://shopify/Customer/1",
                "metafields": { "nodes": [
                    { "id": "gid://shopify/Metafield/1", "namespace": "custom", "key": "birthday", "value": "x", "type": "single_line_text_field" },
                    { "id": "gid://shopify/Metafield/2", "namespace": "custom", "key": "wishlist_products", "value": "[]", "type": "json" }
                ]}
            }
        }))
        .unwrap();

        let customer = data.customer.unwrap();
        let field = customer.wishlist_metafield().unwrap();
        assert_eq!(field.id, "gid://shopify/Metafield/2");
    }

    #[test]
    fn product_nodes_tolerate_nulls_and_foreign_types() {
        let data: ProductsByIdsData = serde_json::from_value(json!({
            "nodes": [
                { "id": "gid://shopify/Product/1", "handle": "tee", "title": "Tee" },
                null,
                {}
            ]
        }))
        .unwrap();

        assert_eq!(data.nodes.len(), 3);
        assert!(data.nodes[1].is_none());
        assert!(data.nodes[2].as_ref().unwrap().id.is_none());
    }
}
