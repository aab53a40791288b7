//! HTTP client for the catalog API's authenticated `GET /products` endpoint.

mod fetch_all;

use std::time::Duration;

use reqwest::Client;
use stockwatch_core::AppConfig;

use crate::error::CatalogError;
use crate::rate_limit::retry_with_backoff;
use crate::types::CatalogProductsResponse;

/// Maximum number of pages to fetch before returning an error.
/// Prevents infinite loops on cycling cursors.
pub(crate) const MAX_PAGES: usize = 200;

/// Page size requested from the upstream, which is also its maximum.
pub const PAGE_LIMIT: u32 = 250;

/// HTTP client for the catalog API.
///
/// Every request carries `Authorization: Bearer <key>` and asks for active
/// products only. Transient errors (429, 5xx, network failures) are retried
/// with exponential backoff up to `max_retries` additional attempts.
pub struct CatalogClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    api_key: String,
    pub(crate) max_retries: u32,
    pub(crate) backoff_base_secs: u64,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("max_retries", &self.max_retries)
            .field("backoff_base_secs", &self.backoff_base_secs)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Creates a client with the given timeout, `User-Agent` and retry policy.
    ///
    /// `max_retries = 0` disables retrying.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute URL, or [`CatalogError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, CatalogError> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        reqwest::Url::parse(&base_url).map_err(|e| CatalogError::InvalidBaseUrl {
            base_url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the catalog settings in [`AppConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotConfigured`] when `ECOMMERCE_API_URL` or
    /// `ECOMMERCE_API_KEY` is unset, plus any error from [`Self::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let base_url = config
            .catalog_api_url
            .as_deref()
            .ok_or(CatalogError::NotConfigured("ECOMMERCE_API_URL"))?;
        let api_key = config
            .catalog_api_key
            .as_deref()
            .ok_or(CatalogError::NotConfigured("ECOMMERCE_API_KEY"))?;

        Self::new(
            base_url,
            api_key,
            config.catalog_request_timeout_secs,
            &config.catalog_user_agent,
            config.catalog_max_retries,
            config.catalog_retry_backoff_base_secs,
        )
    }

    /// Fetches one page of products, with automatic retry on transient errors.
    /// Returns the parsed page and the raw `Link` header, if any.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::RateLimited`]: HTTP 429 after all retries.
    /// - [`CatalogError::Unauthorized`]: HTTP 401 or 403 (not retried).
    /// - [`CatalogError::UnexpectedStatus`]: any other non-2xx status (5xx retried).
    /// - [`CatalogError::Http`]: network or TLS failure after all retries.
    /// - [`CatalogError::Deserialize`]: body is not a products document.
    pub async fn fetch_products_page(
        &self,
        page_info: Option<&str>,
    ) -> Result<(CatalogProductsResponse, Option<String>), CatalogError> {
        let url = self.products_url(page_info)?;

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .bearer_auth(&self.api_key)
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(CatalogError::RateLimited { retry_after_secs });
                }

                if status == reqwest::StatusCode::UNAUTHORIZED
                    || status == reqwest::StatusCode::FORBIDDEN
                {
                    return Err(CatalogError::Unauthorized {
                        status: status.as_u16(),
                    });
                }

                if !status.is_success() {
                    return Err(CatalogError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                // Read the Link header before the body consumes the response.
                let link_header = response
                    .headers()
                    .get(reqwest::header::LINK)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);

                let body = response.text().await?;
                let parsed = serde_json::from_str::<CatalogProductsResponse>(&body).map_err(
                    |e| CatalogError::Deserialize {
                        context: format!("products page from {url}"),
                        source: e,
                    },
                )?;

                Ok((parsed, link_header))
            }
        })
        .await
    }

    /// `{base}/products?limit=250&status=active[&page_info=CURSOR]`.
    fn products_url(&self, page_info: Option<&str>) -> Result<String, CatalogError> {
        let mut url = reqwest::Url::parse(&format!("{}/products", self.base_url)).map_err(|e| {
            CatalogError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
                reason: e.to_string(),
            }
        })?;

        url.query_pairs_mut()
            .append_pair("limit", &PAGE_LIMIT.to_string())
            .append_pair("status", "active");

        if let Some(cursor) = page_info {
            url.query_pairs_mut().append_pair("page_info", cursor);
        }

        Ok(url.to_string())
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
