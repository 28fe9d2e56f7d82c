//! Product detail lookup for new wishlist entries.

use tracing::{debug, instrument, warn};
use wishlist_core::ProductId;

use crate::shopify::queries::{PRODUCTS_BY_IDS, ProductNode, ProductsByIdsData, products_by_ids_variables};
use crate::shopify::{ShopifyApi, query_as};

/// Display details for a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    /// Bare product id.
    pub id: String,
    pub handle: Option<String>,
    pub title: String,
}

impl ProductSummary {
    /// Details used when the product cannot be resolved.
    #[must_use]
    pub fn placeholder(product: &ProductId) -> Self {
        Self {
            id: product.bare().to_string(),
            handle: None,
            title: format!("Product {}", product.bare()),
        }
    }

    fn from_node(product: &ProductId, node: &ProductNode) -> Self {
        let placeholder = Self::placeholder(product);
        Self {
            id: placeholder.id,
            handle: node.handle.clone().filter(|h| !h.is_empty()),
            title: node
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or(placeholder.title),
        }
    }
}

/// Resolves product ids to display details.
///
/// Lookup never fails: any error degrades to [`ProductSummary::placeholder`].
pub struct ProductLookup<'a, C> {
    client: &'a C,
}

impl<'a, C: ShopifyApi> ProductLookup<'a, C> {
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Resolve details for each product, in input order.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn resolve(&self, products: &[ProductId]) -> Vec<ProductSummary> {
        if products.is_empty() {
            return Vec::new();
        }

        let data: ProductsByIdsData = match query_as(
            self.client,
            &PRODUCTS_BY_IDS,
            products_by_ids_variables(products),
        )
        .await
        {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Product lookup failed, using placeholder details");
                return products.iter().map(ProductSummary::placeholder).collect();
            }
        };

        products
            .iter()
            .map(|product| {
                data.nodes
                    .iter()
                    .flatten()
                    .find(|node| node_matches(node, product))
                    .map_or_else(
                        || {
                            debug!(product_id = %product.bare(), "Product not found");
                            ProductSummary::placeholder(product)
                        },
                        |node| ProductSummary::from_node(product, node),
                    )
            })
            .collect()
    }

    /// Resolve details for a single product.
    pub async fn resolve_one(&self, product: &ProductId) -> ProductSummary {
        self.resolve(std::slice::from_ref(product))
            .await
            .pop()
            .unwrap_or_else(|| ProductSummary::placeholder(product))
    }
}

fn node_matches(node: &ProductNode, product: &ProductId) -> bool {
    node.id
        .as_deref()
        .and_then(|id| ProductId::parse(id).ok())
        .is_some_and(|id| id == *product)
}
