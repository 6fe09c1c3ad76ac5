//! Storefront product reads.

use divan_core::catalog::related_products;
use divan_core::{Product, ProductId};
use futures::future::join_all;

use crate::client::ApiClient;
use crate::error::ApiError;

/// A product page: the product itself plus up to four siblings from its
/// category.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub product: Product,
    pub related: Vec<Product>,
}

impl ApiClient {
    /// Fetches the whole catalog. A failed fetch is logged and yields an
    /// empty list so the storefront still renders.
    pub async fn load_catalog(&self) -> Vec<Product> {
        match self.products().get_all().await {
            Ok(products) => {
                tracing::debug!(count = products.len(), "catalog loaded");
                products
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load catalog");
                Vec::new()
            }
        }
    }

    /// Fetches one product and the full list concurrently.
    ///
    /// The related list is best-effort: if the full fetch fails it is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the product itself cannot be fetched.
    pub async fn product_detail(&self, id: &ProductId) -> Result<ProductDetail, ApiError> {
        let products = self.products();
        let (product, all) = tokio::join!(products.get_by_id(id), products.get_all());
        let product = product?;

        let related = match all {
            Ok(all) => related_products(&all, &product).into_iter().cloned().collect(),
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "related products unavailable");
                Vec::new()
            }
        };
        Ok(ProductDetail { product, related })
    }

    /// Looks up each id concurrently. Ids that fail to resolve are logged and
    /// dropped; the rest keep the order of `ids`.
    pub async fn favorite_products(&self, ids: &[ProductId]) -> Vec<Product> {
        let products = self.products();
        let lookups = ids.iter().map(|id| products.get_by_id(id));
        join_all(lookups)
            .await
            .into_iter()
            .zip(ids)
            .filter_map(|(result, id)| match result {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(product_id = %id, error = %e, "dropping unresolvable favorite");
                    None
                }
            })
            .collect()
    }
}
