//! HTTP client for the supplier's product API.
//!
//! Wraps `reqwest` with supplier-specific error handling and typed response
//! deserialization. Upstream 429 responses are converted into
//! [`SupplierError::RateLimited`] and recorded in the shared
//! [`RateLimitGovernor`] before returning, so concurrent callers see the
//! cooldown without having to hit the API themselves.

use std::time::Duration;

use reqwest::{header::RETRY_AFTER, Client, StatusCode, Url};

use crate::error::SupplierError;
use crate::governor::RateLimitGovernor;
use crate::types::{ProductEnvelope, SupplierProduct};

/// Cooldown assumed when the supplier sends 429 without a `Retry-After`
/// header.
const DEFAULT_RATE_LIMIT_COOLDOWN_SECS: u64 = 60;

/// Client for one supplier's product API.
///
/// Built per supplier from the credentials stored on the supplier record; the
/// endpoint is configurable so tests can point it at a wiremock server.
pub struct SupplierClient {
    client: Client,
    api_key: String,
    supplier_id: String,
    products_url: Url,
    governor: RateLimitGovernor,
}

impl SupplierClient {
    /// Creates a client for `supplier_id` against `endpoint`.
    ///
    /// `supplier_id` keys the governor's cooldown state. Requests carry the
    /// API key as a bearer token and are bounded by `timeout_secs` so a hung
    /// upstream cannot stall a batch indefinitely.
    ///
    /// # Errors
    ///
    /// Returns [`SupplierError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SupplierError::ApiError`] if `endpoint` is
    /// not a valid URL.
    pub fn new(
        supplier_id: &str,
        api_key: &str,
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
        governor: RateLimitGovernor,
    ) -> Result<Self, SupplierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent.to_owned())
            .build()?;

        // Normalise: exactly one trailing slash so join() appends to the root
        // path instead of replacing the last segment.
        let normalised = format!("{}/", endpoint.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| SupplierError::ApiError(format!("invalid endpoint '{endpoint}': {e}")))?;
        let products_url = base_url
            .join("products")
            .map_err(|e| SupplierError::ApiError(format!("invalid endpoint '{endpoint}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            supplier_id: supplier_id.to_owned(),
            products_url,
            governor,
        })
    }

    /// Fetches the full product description for a canonical product id.
    ///
    /// # Errors
    ///
    /// - [`SupplierError::RateLimited`] on an upstream 429; the governor
    ///   cooldown for this supplier has already been extended.
    /// - [`SupplierError::NotFound`] when the supplier has no such product.
    /// - [`SupplierError::ApiError`] when the envelope reports failure.
    /// - [`SupplierError::Http`] on network failure, timeout, or another
    ///   non-2xx status.
    /// - [`SupplierError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn get_product(&self, product_id: &str) -> Result<SupplierProduct, SupplierError> {
        let url = self.product_url(product_id);
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = parse_retry_after(&response)
                .unwrap_or(DEFAULT_RATE_LIMIT_COOLDOWN_SECS);
            self.governor
                .apply_cooldown(&self.supplier_id, Duration::from_secs(retry_after_secs));
            tracing::warn!(
                supplier = %self.supplier_id,
                retry_after_secs,
                "supplier rate limit hit, cooldown recorded"
            );
            return Err(SupplierError::RateLimited { retry_after_secs });
        }

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SupplierError::NotFound {
                product_id: product_id.to_owned(),
            });
        }

        let response = response.error_for_status()?;
        let body = response.text().await?;
        let envelope: ProductEnvelope =
            serde_json::from_str(&body).map_err(|e| SupplierError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        if !envelope.success {
            return Err(SupplierError::ApiError(
                envelope.error.unwrap_or_else(|| "unknown error".to_owned()),
            ));
        }

        envelope.product.ok_or_else(|| {
            SupplierError::ApiError("success envelope without product payload".to_owned())
        })
    }

    /// Builds the product-detail URL with the canonical id as a query
    /// parameter, percent-encoded by [`Url::query_pairs_mut`].
    fn product_url(&self, product_id: &str) -> Url {
        let mut url = self.products_url.clone();
        url.query_pairs_mut().append_pair("pid", product_id);
        url
    }
}

fn parse_retry_after(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}
