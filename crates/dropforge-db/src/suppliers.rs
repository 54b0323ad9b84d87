//! Read access to the `suppliers` table.
//!
//! Supplier records (credentials included) are owned by the admin CRUD
//! surface; the import pipeline only ever reads them.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `suppliers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SupplierRow {
    pub id: Uuid,
    pub name: String,
    /// API bearer token; `NULL` until the operator configures credentials.
    pub api_key: Option<String>,
    /// Base URL of the supplier's product API.
    pub api_endpoint: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupplierRow {
    /// Returns the `(api_key, api_endpoint)` pair when both are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.api_key.as_deref(), self.api_endpoint.as_deref()) {
            (Some(key), Some(endpoint)) if !key.is_empty() && !endpoint.is_empty() => {
                Some((key, endpoint))
            }
            _ => None,
        }
    }
}

/// Fetches a supplier by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_supplier(pool: &PgPool, id: Uuid) -> Result<Option<SupplierRow>, DbError> {
    let row = sqlx::query_as::<_, SupplierRow>(
        "SELECT id, name, api_key, api_endpoint, status, created_at, updated_at \
         FROM suppliers \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supplier_with(api_key: Option<&str>, api_endpoint: Option<&str>) -> SupplierRow {
        SupplierRow {
            id: Uuid::new_v4(),
            name: "Test Supplier".to_owned(),
            api_key: api_key.map(ToOwned::to_owned),
            api_endpoint: api_endpoint.map(ToOwned::to_owned),
            status: "active".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn credentials_present_when_both_configured() {
        let supplier = supplier_with(Some("key"), Some("https://api.example.com"));
        assert_eq!(
            supplier.credentials(),
            Some(("key", "https://api.example.com"))
        );
    }

    #[test]
    fn credentials_absent_when_either_missing_or_blank() {
        assert!(supplier_with(None, Some("https://api.example.com"))
            .credentials()
            .is_none());
        assert!(supplier_with(Some("key"), None).credentials().is_none());
        assert!(supplier_with(Some(""), Some("https://api.example.com"))
            .credentials()
            .is_none());
    }
}
