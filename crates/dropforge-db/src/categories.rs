//! Read access to the `categories` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `categories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Fetches a category by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_category(pool: &PgPool, id: Uuid) -> Result<Option<CategoryRow>, DbError> {
    let row = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, created_at FROM categories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
