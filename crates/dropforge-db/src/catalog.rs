//! Database operations for `products`, `product_images`, and
//! `product_variants`, including the transactional multi-entity write the
//! import pipeline depends on.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub compare_at_price: Option<Decimal>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub weight: Option<Decimal>,
    pub inventory: i32,
    pub category_id: Uuid,
    /// `NULL` for products not sourced from a supplier.
    pub supplier_id: Option<Uuid>,
    /// Canonical id (`pid:<digits>:null`); unique per supplier.
    pub supplier_product_id: Option<String>,
    /// Fractional markup the retail price was derived with.
    pub profit_margin: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row from the `product_images` table. Position 0 is the primary image;
/// secondaries count up from 1.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductImageRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: String,
    pub position: i32,
    pub alt: Option<String>,
}

/// A row from the `product_variants` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductVariantRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub sku: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub compare_at_price: Option<Decimal>,
    pub inventory: i32,
    pub variant_type: Option<String>,
    /// Structured attribute list, e.g. `[{"name": "Color", "value": "Black"}]`.
    pub options: serde_json::Value,
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Insert payloads
// ---------------------------------------------------------------------------

/// Product fields for [`create_full_product`].
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub cost_price: Decimal,
    pub compare_at_price: Decimal,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub weight: Option<Decimal>,
    pub inventory: i32,
    pub category_id: Uuid,
    pub supplier_id: Uuid,
    pub supplier_product_id: String,
    pub profit_margin: Decimal,
}

/// Image fields for [`create_full_product`].
#[derive(Debug, Clone)]
pub struct NewImage {
    pub url: String,
    pub position: i32,
    pub alt: Option<String>,
}

/// Variant fields for [`create_full_product`].
#[derive(Debug, Clone)]
pub struct NewVariant {
    pub name: String,
    pub sku: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub compare_at_price: Decimal,
    pub inventory: i32,
    pub variant_type: Option<String>,
    pub options: serde_json::Value,
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Looks up a product by its dedup key `(supplier_id, supplier_product_id)`.
///
/// The pipeline calls this before every write; the unique constraint on the
/// same pair is only the backstop for concurrent batches, never the primary
/// duplicate check.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_product_by_supplier_product_id(
    pool: &PgPool,
    supplier_id: Uuid,
    supplier_product_id: &str,
) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, slug, description, price, cost_price, compare_at_price, \
                sku, barcode, weight, inventory, category_id, supplier_id, \
                supplier_product_id, profit_margin, created_at, updated_at \
         FROM products \
         WHERE supplier_id = $1 AND supplier_product_id = $2",
    )
    .bind(supplier_id)
    .bind(supplier_product_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Atomically creates a product together with its images and variants.
///
/// All inserts run in one transaction: if any of them fails, none of the rows
/// persist. Returns the new product's id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails (including a unique-constraint
/// violation on the dedup key when a concurrent batch won the race).
pub async fn create_full_product(
    pool: &PgPool,
    product: &NewProduct,
    images: &[NewImage],
    variants: &[NewVariant],
) -> Result<Uuid, DbError> {
    let mut tx = pool.begin().await?;

    let product_id: Uuid = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO products \
             (name, slug, description, price, cost_price, compare_at_price, \
              sku, barcode, weight, inventory, category_id, supplier_id, \
              supplier_product_id, profit_margin) \
         VALUES ($1, $2, $3, $4, $5, $6, \
                 $7, $8, $9, $10, $11, $12, \
                 $13, $14) \
         RETURNING id",
    )
    .bind(&product.name)
    .bind(&product.slug)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.cost_price)
    .bind(product.compare_at_price)
    .bind(&product.sku)
    .bind(&product.barcode)
    .bind(product.weight)
    .bind(product.inventory)
    .bind(product.category_id)
    .bind(product.supplier_id)
    .bind(&product.supplier_product_id)
    .bind(product.profit_margin)
    .fetch_one(&mut *tx)
    .await?;

    for image in images {
        sqlx::query(
            "INSERT INTO product_images (product_id, url, position, alt) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(product_id)
        .bind(&image.url)
        .bind(image.position)
        .bind(&image.alt)
        .execute(&mut *tx)
        .await?;
    }

    for variant in variants {
        sqlx::query(
            "INSERT INTO product_variants \
                 (product_id, name, sku, price, cost_price, compare_at_price, \
                  inventory, variant_type, options, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9::jsonb, $10)",
        )
        .bind(product_id)
        .bind(&variant.name)
        .bind(&variant.sku)
        .bind(variant.price)
        .bind(variant.cost_price)
        .bind(variant.compare_at_price)
        .bind(variant.inventory)
        .bind(&variant.variant_type)
        .bind(&variant.options)
        .bind(&variant.image_url)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(product_id)
}
