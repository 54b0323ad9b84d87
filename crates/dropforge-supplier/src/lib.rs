//! HTTP client and rate-limit plumbing for the dropshipping supplier API.
//!
//! The supplier enforces a hard 1 request/second ceiling per account. The
//! [`RateLimitGovernor`] holds the process-wide cooldown state so every caller
//! shares knowledge of an upstream 429, and [`SupplierClient`] feeds it
//! whenever the supplier pushes back.

mod client;
mod error;
mod governor;
mod types;

pub use client::SupplierClient;
pub use error::SupplierError;
pub use governor::RateLimitGovernor;
pub use types::{ProductEnvelope, SupplierProduct, SupplierVariant, VariantOption};
