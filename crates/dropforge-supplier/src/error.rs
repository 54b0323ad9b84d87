use thiserror::Error;

/// Errors returned by the supplier API client.
#[derive(Debug, Error)]
pub enum SupplierError {
    /// Network or TLS failure from the underlying HTTP client, including
    /// request timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The supplier responded with 429. The wait time is taken from the
    /// `Retry-After` header and has already been recorded in the
    /// [`RateLimitGovernor`](crate::RateLimitGovernor) when this is returned.
    #[error("supplier rate limit in effect, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The supplier does not know this product id.
    #[error("product {product_id} not found at supplier")]
    NotFound { product_id: String },

    /// The supplier returned a well-formed envelope with `"success": false`.
    #[error("supplier API error: {0}")]
    ApiError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
