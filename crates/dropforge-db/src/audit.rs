//! Append-only import audit trail.
//!
//! Audit writes happen after the product transaction has committed and are
//! best-effort by policy: the caller logs a failure and moves on rather than
//! rolling anything back.

use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Appends one audit entry for an import pipeline action.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails. Callers are expected to
/// treat this as non-fatal.
pub async fn record_import_audit(
    pool: &PgPool,
    supplier_id: Uuid,
    product_id: Uuid,
    action: &str,
    detail: serde_json::Value,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO import_audit_log (supplier_id, product_id, action, detail) \
         VALUES ($1, $2, $3, $4::jsonb)",
    )
    .bind(supplier_id)
    .bind(product_id)
    .bind(action)
    .bind(detail)
    .execute(pool)
    .await?;

    Ok(())
}
