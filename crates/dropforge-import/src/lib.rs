//! Batch import of supplier catalog data into the store's own catalog.
//!
//! One batch = one supplier, one category, a list of raw product identifiers
//! and a markup. The pipeline normalizes each identifier, paces fetches under
//! the supplier's rate limit, deduplicates against the existing catalog,
//! derives retail pricing, and materializes product + images + variants in a
//! single transaction per item. Items fail individually; the batch carries on
//! and reports a per-item result for every input id.

mod error;
mod pipeline;
mod results;

pub use error::ImportError;
pub use pipeline::{run_import, ImportRequest, PipelineOptions};
pub use results::{BatchRecorder, BatchSummary, ImportItemResult};
