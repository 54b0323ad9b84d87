//! The batch import orchestrator.
//!
//! Per batch: validate inputs, check the governor, then walk the identifier
//! list sequentially — normalize, pace, fetch, dedup, price, write, record.
//! The only suspension points are the pacing sleep and the fetch itself, so
//! dropping the returned future (caller cancellation) stops cleanly before
//! the next item and never interrupts a committed write.

use std::collections::HashSet;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use tokio::time::Instant;
use uuid::Uuid;

use dropforge_core::{normalize, pricing, slug, AppConfig, DROPSHIP_INVENTORY};
use dropforge_db::{DbError, NewImage, NewProduct, NewVariant};
use dropforge_supplier::{RateLimitGovernor, SupplierClient, SupplierError, SupplierProduct};

use crate::error::ImportError;
use crate::results::{BatchRecorder, BatchSummary};

/// Caller-supplied batch import request. Ids arrive as raw strings and
/// `markup` as an unparsed JSON value so that a non-numeric markup can fall
/// back to the default instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub supplier_id: String,
    pub category_id: String,
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub markup: Option<serde_json::Value>,
}

/// Tunables for one pipeline run, injected so tests can collapse the pacing
/// interval.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Minimum spacing between consecutive supplier fetches. Slightly over
    /// one second in production to stay under the upstream 1 req/s ceiling.
    pub min_request_interval: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            user_agent: "dropforge/0.1 (catalog-import)".to_owned(),
            min_request_interval: Duration::from_millis(1100),
        }
    }
}

impl PipelineOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            request_timeout_secs: config.supplier_request_timeout_secs,
            user_agent: config.supplier_user_agent.clone(),
            min_request_interval: Duration::from_millis(config.supplier_min_request_interval_ms),
        }
    }
}

enum ItemOutcome {
    Created {
        product_id: Uuid,
        product_name: String,
        variants_skipped: u32,
    },
    Duplicate {
        existing_id: Uuid,
    },
}

/// Runs one batch import and returns the per-item summary.
///
/// Validation problems and rate limiting reject the whole call; everything
/// that goes wrong for a single item is recorded in the summary and the loop
/// continues with the next id.
///
/// # Errors
///
/// - [`ImportError::Validation`] for malformed ids, an empty id list after
///   blank filtering, an unknown supplier or category, or a supplier without
///   configured credentials.
/// - [`ImportError::RateLimited`] when the governor reports a pending
///   cooldown at entry, or when the supplier answers 429 mid-batch (the
///   cooldown is shared through the governor either way).
/// - [`ImportError::Db`] for database failures during batch validation.
pub async fn run_import(
    pool: &PgPool,
    governor: &RateLimitGovernor,
    options: &PipelineOptions,
    request: &ImportRequest,
) -> Result<BatchSummary, ImportError> {
    let supplier_id = parse_id("supplierId", &request.supplier_id)?;
    let category_id = parse_id("categoryId", &request.category_id)?;

    let ids: Vec<&str> = request
        .product_ids
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if ids.is_empty() {
        return Err(ImportError::Validation(
            "productIds must contain at least one non-blank id".to_owned(),
        ));
    }

    let supplier = dropforge_db::get_supplier(pool, supplier_id)
        .await?
        .ok_or_else(|| ImportError::Validation(format!("supplier {supplier_id} not found")))?;
    let (api_key, endpoint) = supplier.credentials().ok_or_else(|| {
        ImportError::Validation(format!(
            "supplier '{}' has no API credentials configured",
            supplier.name
        ))
    })?;
    if dropforge_db::get_category(pool, category_id).await?.is_none() {
        return Err(ImportError::Validation(format!(
            "category {category_id} not found"
        )));
    }

    // Admission check before any work: a batch that cannot make its first
    // request is rejected with the wait time instead of blocking.
    let governor_key = supplier_id.to_string();
    let wait_secs = governor.seconds_until_ready(&governor_key);
    if wait_secs > 0 {
        return Err(ImportError::RateLimited { wait_secs });
    }

    let markup = pricing::resolve_markup(request.markup.as_ref());

    let client = SupplierClient::new(
        &governor_key,
        api_key,
        endpoint,
        options.request_timeout_secs,
        &options.user_agent,
        governor.clone(),
    )
    .map_err(|e| ImportError::Validation(format!("supplier endpoint unusable: {e}")))?;

    tracing::info!(
        supplier = %supplier.name,
        items = ids.len(),
        %markup,
        "starting catalog import batch"
    );

    let mut recorder = BatchRecorder::new();
    let mut last_request: Option<Instant> = None;

    for raw_id in ids {
        let canonical = normalize::canonicalize_product_id(raw_id);

        // In-loop pacing, independent of the entry gate: the gate stops a
        // doomed batch from starting, this keeps a running batch under the
        // 1 req/s ceiling.
        if let Some(last) = last_request {
            let elapsed = last.elapsed();
            if elapsed < options.min_request_interval {
                tokio::time::sleep(options.min_request_interval - elapsed).await;
            }
        }
        last_request = Some(Instant::now());

        let fetched = match client.get_product(&canonical).await {
            Ok(product) => product,
            Err(SupplierError::RateLimited { retry_after_secs }) => {
                // The client has already extended the shared cooldown; abort
                // the batch so no further request hits the limit.
                tracing::warn!(
                    supplier = %supplier.name,
                    retry_after_secs,
                    "rate limited mid-batch, aborting remaining items"
                );
                return Err(ImportError::RateLimited {
                    wait_secs: retry_after_secs,
                });
            }
            Err(e) => {
                tracing::warn!(product = %canonical, error = %e, "supplier fetch failed");
                recorder.record_failure(raw_id, &canonical, e.to_string());
                continue;
            }
        };

        match import_item(pool, supplier_id, category_id, &canonical, &fetched, markup).await {
            Ok(ItemOutcome::Created {
                product_id,
                product_name,
                variants_skipped,
            }) => {
                recorder.record_created(
                    raw_id,
                    &canonical,
                    product_id,
                    &product_name,
                    variants_skipped,
                );
            }
            Ok(ItemOutcome::Duplicate { existing_id }) => {
                recorder.record_duplicate(raw_id, &canonical, existing_id);
            }
            Err(e) => {
                tracing::warn!(product = %canonical, error = %e, "import item failed");
                recorder.record_failure(raw_id, &canonical, e.to_string());
            }
        }
    }

    let summary = recorder.finish();
    tracing::info!(supplier = %supplier.name, message = %summary.message, "import batch finished");
    Ok(summary)
}

/// Dedup check plus the transactional write for one fetched product.
///
/// Every error here is per-item by policy; the caller converts it into a
/// failure result and moves on.
async fn import_item(
    pool: &PgPool,
    supplier_id: Uuid,
    category_id: Uuid,
    canonical: &str,
    fetched: &SupplierProduct,
    markup: Decimal,
) -> Result<ItemOutcome, DbError> {
    if let Some(existing) =
        dropforge_db::find_product_by_supplier_product_id(pool, supplier_id, canonical).await?
    {
        return Ok(ItemOutcome::Duplicate {
            existing_id: existing.id,
        });
    }

    let cost = fetched.sell_price;
    let new_product = NewProduct {
        name: fetched.name.clone(),
        slug: slug::product_slug(&fetched.name),
        description: fetched.description.clone(),
        price: pricing::sell_price(cost, markup),
        cost_price: cost,
        compare_at_price: pricing::compare_at_price(cost, markup),
        sku: fetched.sku.clone(),
        barcode: fetched.barcode.clone(),
        weight: fetched.weight,
        inventory: DROPSHIP_INVENTORY,
        category_id,
        supplier_id,
        supplier_product_id: canonical.to_owned(),
        profit_margin: markup,
    };

    let images = build_images(fetched);
    let (variants, variants_skipped) = build_variants(fetched, markup);

    let product_id = dropforge_db::create_full_product(pool, &new_product, &images, &variants).await?;

    // Audit is best-effort and outside the transaction: the product is
    // already committed, so a trail failure must not undo it.
    if let Err(e) = dropforge_db::record_import_audit(
        pool,
        supplier_id,
        product_id,
        "product_imported",
        serde_json::json!({
            "canonicalId": canonical,
            "name": fetched.name,
            "variants": variants.len(),
            "variantsSkipped": variants_skipped,
        }),
    )
    .await
    {
        tracing::warn!(product = %canonical, error = %e, "audit write failed after commit");
    }

    Ok(ItemOutcome::Created {
        product_id,
        product_name: fetched.name.clone(),
        variants_skipped,
    })
}

/// Primary image at position 0, then each additional distinct URL from the
/// image set at increasing positions from 1, skipping blanks and repeats of
/// the primary.
fn build_images(fetched: &SupplierProduct) -> Vec<NewImage> {
    let mut images = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    if let Some(primary) = fetched.image.as_deref().filter(|u| !u.is_empty()) {
        seen.insert(primary);
        images.push(NewImage {
            url: primary.to_owned(),
            position: 0,
            alt: Some(fetched.name.clone()),
        });
    }

    let mut position = 1;
    for url in &fetched.images {
        if url.is_empty() || !seen.insert(url) {
            continue;
        }
        images.push(NewImage {
            url: url.clone(),
            position,
            alt: None,
        });
        position += 1;
    }

    images
}

/// Converts supplier variants into insertable rows, pricing each one with its
/// own cost (falling back to the parent cost). Variants without both an id
/// and a name are dropped, not failed; the skip count is surfaced in the
/// per-item result.
fn build_variants(fetched: &SupplierProduct, markup: Decimal) -> (Vec<NewVariant>, u32) {
    let mut variants = Vec::new();
    let mut skipped = 0u32;

    for variant in &fetched.variants {
        let vid = variant.vid.as_deref().filter(|v| !v.trim().is_empty());
        let name = variant.name.as_deref().filter(|n| !n.trim().is_empty());
        let (Some(vid), Some(name)) = (vid, name) else {
            skipped += 1;
            continue;
        };

        let cost = variant.sell_price.unwrap_or(fetched.sell_price);
        let options = serde_json::to_value(&variant.options)
            .unwrap_or_else(|_| serde_json::Value::Array(Vec::new()));

        variants.push(NewVariant {
            name: name.to_owned(),
            // Fall back to the supplier variant id when no SKU is on file so
            // the variant stays traceable.
            sku: variant.sku.clone().or_else(|| Some(vid.to_owned())),
            price: pricing::sell_price(cost, markup),
            cost_price: Some(cost),
            compare_at_price: pricing::compare_at_price(cost, markup),
            inventory: DROPSHIP_INVENTORY,
            variant_type: variant.variant_type.clone(),
            options,
            image_url: variant.image.clone(),
        });
    }

    (variants, skipped)
}

fn parse_id(field: &str, raw: &str) -> Result<Uuid, ImportError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ImportError::Validation(format!("{field} must be a valid UUID")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropforge_supplier::{SupplierVariant, VariantOption};

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    fn fetched_product() -> SupplierProduct {
        serde_json::from_value(serde_json::json!({
            "name": "Wireless Earbuds Pro",
            "sell_price": "10.00",
            "image": "https://cdn.example.com/main.jpg",
            "images": [
                "https://cdn.example.com/main.jpg",
                "https://cdn.example.com/alt.jpg",
                "https://cdn.example.com/alt.jpg",
                ""
            ]
        }))
        .expect("valid product payload")
    }

    fn variant(vid: Option<&str>, name: Option<&str>, price: Option<&str>) -> SupplierVariant {
        let mut value = serde_json::json!({});
        if let Some(vid) = vid {
            value["vid"] = vid.into();
        }
        if let Some(name) = name {
            value["name"] = name.into();
        }
        if let Some(price) = price {
            value["sell_price"] = price.into();
        }
        serde_json::from_value(value).expect("valid variant payload")
    }

    #[test]
    fn build_images_places_primary_at_zero_and_dedupes() {
        let images = build_images(&fetched_product());
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].position, 0);
        assert_eq!(images[0].url, "https://cdn.example.com/main.jpg");
        assert_eq!(images[0].alt.as_deref(), Some("Wireless Earbuds Pro"));
        assert_eq!(images[1].position, 1);
        assert_eq!(images[1].url, "https://cdn.example.com/alt.jpg");
    }

    #[test]
    fn build_images_without_primary_starts_secondaries_at_one() {
        let mut product = fetched_product();
        product.image = None;
        let images = build_images(&product);
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].position, 1);
        assert_eq!(images[1].position, 2);
    }

    #[test]
    fn build_variants_prices_with_own_cost_or_parent_fallback() {
        let mut product = fetched_product();
        product.variants = vec![
            variant(Some("v-1"), Some("Black"), Some("8.00")),
            variant(Some("v-2"), Some("White"), None),
        ];

        let (variants, skipped) = build_variants(&product, dec("0.3"));
        assert_eq!(skipped, 0);
        assert_eq!(variants[0].price, dec("10.40"));
        assert_eq!(variants[0].compare_at_price, dec("14.40"));
        // Parent cost 10.00 when the variant has none.
        assert_eq!(variants[1].price, dec("13.00"));
        assert_eq!(variants[1].cost_price, Some(dec("10.00")));
    }

    #[test]
    fn build_variants_drops_entries_missing_id_or_name() {
        let mut product = fetched_product();
        product.variants = vec![
            variant(Some("v-1"), Some("Black"), None),
            variant(None, Some("Ghost"), None),
            variant(Some("v-3"), None, None),
            variant(Some("  "), Some("Blank id"), None),
        ];

        let (variants, skipped) = build_variants(&product, dec("0.3"));
        assert_eq!(variants.len(), 1);
        assert_eq!(skipped, 3);
        assert_eq!(variants[0].name, "Black");
    }

    #[test]
    fn build_variants_falls_back_to_vid_for_missing_sku() {
        let mut product = fetched_product();
        product.variants = vec![variant(Some("v-9"), Some("Red"), None)];

        let (variants, _) = build_variants(&product, dec("0.3"));
        assert_eq!(variants[0].sku.as_deref(), Some("v-9"));
    }

    #[test]
    fn build_variants_serializes_options_to_json() {
        let mut product = fetched_product();
        let mut v = variant(Some("v-1"), Some("Black"), None);
        v.options = vec![VariantOption {
            name: "Color".to_owned(),
            value: "Black".to_owned(),
        }];
        product.variants = vec![v];

        let (variants, _) = build_variants(&product, dec("0.3"));
        assert_eq!(
            variants[0].options,
            serde_json::json!([{"name": "Color", "value": "Black"}])
        );
    }

    #[test]
    fn parse_id_rejects_blank_and_malformed_input() {
        assert!(parse_id("supplierId", "").is_err());
        assert!(parse_id("supplierId", "not-a-uuid").is_err());
        assert!(parse_id("supplierId", &Uuid::new_v4().to_string()).is_ok());
    }
}
