//! Supplier API response types.
//!
//! The supplier wraps every response in a `{"success": bool, ...}` envelope;
//! prices arrive as decimal strings and are parsed into `Decimal` at the wire
//! boundary so no float ever touches money.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Envelope for the product-detail endpoint:
/// `{ "success": true, "product": { ... } }` or
/// `{ "success": false, "error": "..." }`.
#[derive(Debug, Deserialize)]
pub struct ProductEnvelope {
    pub success: bool,
    #[serde(default)]
    pub product: Option<SupplierProduct>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Full product description returned by the supplier for one canonical id.
///
/// `sell_price` is the supplier's price to us — the pipeline treats it as our
/// cost when deriving retail pricing.
#[derive(Debug, Clone, Deserialize)]
pub struct SupplierProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub sell_price: Decimal,
    #[serde(default)]
    pub sku: Option<String>,
    /// Barcode / EAN, when the supplier has one on file.
    #[serde(default)]
    pub barcode: Option<String>,
    /// Shipping weight in grams.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub weight: Option<Decimal>,
    /// Packed dimensions as a free-form string (e.g. `"10x4x4cm"`).
    #[serde(default)]
    pub dimensions: Option<String>,
    /// Primary image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Full image set; may repeat the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub variants: Vec<SupplierVariant>,
}

/// A purchasable variant within a [`SupplierProduct`].
///
/// Supplier exports are messy: `vid` and `name` are both nominally required
/// but either can be missing, so both are optional here and the import policy
/// decides what to do with incomplete entries.
#[derive(Debug, Clone, Deserialize)]
pub struct SupplierVariant {
    #[serde(default)]
    pub vid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    /// Variant-specific cost; falls back to the parent product's price when
    /// absent.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub sell_price: Option<Decimal>,
    #[serde(default, rename = "type")]
    pub variant_type: Option<String>,
    #[serde(default)]
    pub options: Vec<VariantOption>,
    #[serde(default)]
    pub image: Option<String>,
}

/// One attribute of a variant, e.g. `{"name": "Color", "value": "Black"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantOption {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_envelope_parses_success_payload() {
        let body = serde_json::json!({
            "success": true,
            "product": {
                "name": "Wireless Earbuds",
                "sell_price": "12.50",
                "image": "https://cdn.example.com/main.jpg",
                "images": ["https://cdn.example.com/main.jpg", "https://cdn.example.com/alt.jpg"],
                "variants": [
                    {
                        "vid": "v-1",
                        "name": "Black",
                        "sell_price": "11.90",
                        "type": "color",
                        "options": [{"name": "Color", "value": "Black"}]
                    }
                ]
            }
        });

        let envelope: ProductEnvelope = serde_json::from_value(body).expect("parse envelope");
        assert!(envelope.success);
        let product = envelope.product.expect("product present");
        assert_eq!(product.name, "Wireless Earbuds");
        assert_eq!(product.sell_price.to_string(), "12.50");
        assert_eq!(product.images.len(), 2);
        assert_eq!(product.variants.len(), 1);
        assert_eq!(product.variants[0].vid.as_deref(), Some("v-1"));
        assert_eq!(product.variants[0].options[0].value, "Black");
    }

    #[test]
    fn product_envelope_parses_error_payload() {
        let body = serde_json::json!({"success": false, "error": "product disabled"});
        let envelope: ProductEnvelope = serde_json::from_value(body).expect("parse envelope");
        assert!(!envelope.success);
        assert!(envelope.product.is_none());
        assert_eq!(envelope.error.as_deref(), Some("product disabled"));
    }

    #[test]
    fn variant_without_price_or_id_still_parses() {
        let body = serde_json::json!({"name": "Mystery"});
        let variant: SupplierVariant = serde_json::from_value(body).expect("parse variant");
        assert!(variant.vid.is_none());
        assert!(variant.sell_price.is_none());
        assert!(variant.options.is_empty());
    }
}
