//! Per-item outcome accumulation for a batch import.

use serde::Serialize;
use uuid::Uuid;

/// Outcome for one input identifier. Emitted in input order, one entry per
/// id, never merged within a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportItemResult {
    pub requested_id: String,
    pub canonical_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the item failed because the product was already imported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_product_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_product_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Number of malformed source variants (missing id or name) dropped for
    /// this item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants_skipped: Option<u32>,
}

/// The batch response: `success` is `true` whenever the batch ran, even if
/// every item failed — only validation or rate-limit rejection fails the call
/// itself.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub success: bool,
    pub message: String,
    pub results: Vec<ImportItemResult>,
}

/// Accumulates per-item results in input order and produces the batch
/// summary.
#[derive(Debug, Default)]
pub struct BatchRecorder {
    results: Vec<ImportItemResult>,
}

impl BatchRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_created(
        &mut self,
        requested_id: &str,
        canonical_id: &str,
        product_id: Uuid,
        product_name: &str,
        variants_skipped: u32,
    ) {
        self.results.push(ImportItemResult {
            requested_id: requested_id.to_owned(),
            canonical_id: canonical_id.to_owned(),
            success: true,
            error: None,
            existing_product_id: None,
            created_product_id: Some(product_id),
            product_name: Some(product_name.to_owned()),
            variants_skipped: (variants_skipped > 0).then_some(variants_skipped),
        });
    }

    pub fn record_duplicate(&mut self, requested_id: &str, canonical_id: &str, existing_id: Uuid) {
        self.results.push(ImportItemResult {
            requested_id: requested_id.to_owned(),
            canonical_id: canonical_id.to_owned(),
            success: false,
            error: Some("product already imported".to_owned()),
            existing_product_id: Some(existing_id),
            created_product_id: None,
            product_name: None,
            variants_skipped: None,
        });
    }

    pub fn record_failure(&mut self, requested_id: &str, canonical_id: &str, error: String) {
        self.results.push(ImportItemResult {
            requested_id: requested_id.to_owned(),
            canonical_id: canonical_id.to_owned(),
            success: false,
            error: Some(error),
            existing_product_id: None,
            created_product_id: None,
            product_name: None,
            variants_skipped: None,
        });
    }

    #[must_use]
    pub fn finish(self) -> BatchSummary {
        let succeeded = self.results.iter().filter(|r| r.success).count();
        let failed = self.results.len() - succeeded;
        BatchSummary {
            success: true,
            message: format!("Imported {succeeded} products successfully, {failed} failed"),
            results: self.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_counts_successes_and_failures() {
        let mut recorder = BatchRecorder::new();
        recorder.record_created("1", "pid:1:null", Uuid::new_v4(), "A", 0);
        recorder.record_failure("2", "pid:2:null", "fetch failed".to_owned());
        recorder.record_created("3", "pid:3:null", Uuid::new_v4(), "C", 2);

        let summary = recorder.finish();
        assert!(summary.success);
        assert_eq!(summary.message, "Imported 2 products successfully, 1 failed");
        assert_eq!(summary.results.len(), 3);
    }

    #[test]
    fn batch_reports_success_even_when_all_items_fail() {
        let mut recorder = BatchRecorder::new();
        recorder.record_failure("1", "pid:1:null", "boom".to_owned());

        let summary = recorder.finish();
        assert!(summary.success);
        assert_eq!(summary.message, "Imported 0 products successfully, 1 failed");
    }

    #[test]
    fn results_preserve_input_order() {
        let mut recorder = BatchRecorder::new();
        recorder.record_failure("b", "pid:2:null", "x".to_owned());
        recorder.record_created("a", "pid:1:null", Uuid::new_v4(), "A", 0);

        let summary = recorder.finish();
        let order: Vec<&str> = summary
            .results
            .iter()
            .map(|r| r.requested_id.as_str())
            .collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn serialization_uses_camel_case_and_omits_empty_fields() {
        let mut recorder = BatchRecorder::new();
        let existing = Uuid::new_v4();
        recorder.record_duplicate("42", "pid:42:null", existing);

        let json = serde_json::to_value(recorder.finish()).expect("serialize summary");
        let item = &json["results"][0];
        assert_eq!(item["requestedId"], "42");
        assert_eq!(item["canonicalId"], "pid:42:null");
        assert_eq!(item["existingProductId"], existing.to_string());
        assert!(item.get("createdProductId").is_none());
        assert!(item.get("variantsSkipped").is_none());
    }

    #[test]
    fn zero_skipped_variants_is_not_reported() {
        let mut recorder = BatchRecorder::new();
        recorder.record_created("1", "pid:1:null", Uuid::new_v4(), "A", 0);
        recorder.record_created("2", "pid:2:null", Uuid::new_v4(), "B", 3);

        let summary = recorder.finish();
        assert_eq!(summary.results[0].variants_skipped, None);
        assert_eq!(summary.results[1].variants_skipped, Some(3));
    }
}
