use thiserror::Error;

/// Batch-level failures of an import call.
///
/// Per-item problems (fetch failures, duplicates, write errors) never surface
/// here — they are converted into [`ImportItemResult`](crate::ImportItemResult)
/// entries as close to their source as possible. This enum only covers the
/// cases that reject or abort the batch as a whole.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Bad input or missing referenced records; rejected before any side
    /// effect.
    #[error("{0}")]
    Validation(String),

    /// The supplier's rate limit is in effect, either detected at batch entry
    /// via the governor or mid-batch from an upstream 429. Carries the wait
    /// in whole seconds as a structured field rather than a message tag.
    #[error("rate limit in effect, retry in {wait_secs}s")]
    RateLimited { wait_secs: u64 },

    /// Unexpected database failure outside the per-item scope (e.g. during
    /// batch validation).
    #[error(transparent)]
    Db(#[from] dropforge_db::DbError),
}
