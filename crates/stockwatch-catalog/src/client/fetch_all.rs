//! Multi-page fetch loop for `CatalogClient`.

use chrono::Utc;
use stockwatch_core::Product;

use crate::error::CatalogError;
use crate::normalize::normalize_product;
use crate::pagination::extract_next_cursor;
use crate::types::CatalogProduct;

use super::{CatalogClient, MAX_PAGES};

impl CatalogClient {
    /// Fetches every active product, following `Link` header cursors until no
    /// `rel="next"` link is present.
    ///
    /// All-or-nothing: if any page fails, products from earlier pages are
    /// discarded and the error is returned. A partial catalog would look like
    /// mass deletions to downstream consumers.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_products_page`]. Returns
    /// [`CatalogError::PaginationLimit`] past [`MAX_PAGES`] pages.
    pub async fn fetch_all_raw_products(&self) -> Result<Vec<CatalogProduct>, CatalogError> {
        let mut all_products: Vec<CatalogProduct> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(CatalogError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }

            let (response, link_header) = self.fetch_products_page(cursor.as_deref()).await?;
            tracing::debug!(
                page = page_count,
                products = response.products.len(),
                "fetched catalog page"
            );
            all_products.extend(response.products);

            cursor = extract_next_cursor(link_header.as_deref());
            if cursor.is_none() {
                break;
            }
        }

        Ok(all_products)
    }

    /// Fetches and normalizes the full catalog.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_all_raw_products`].
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let raw = self.fetch_all_raw_products().await?;
        let fetched_at = Utc::now();
        let products: Vec<Product> = raw
            .into_iter()
            .map(|product| normalize_product(product, fetched_at))
            .collect();

        tracing::info!(count = products.len(), "fetched catalog products");
        Ok(products)
    }
}
