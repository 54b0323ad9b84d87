//! Canonicalization of supplier product identifiers.
//!
//! Supplier exports and operator spreadsheets spell the same product id in
//! several ways: a bare number, `pid:<n>:null`, a doubled `pid:pid:<n>:null`,
//! or the number embedded in surrounding text. All of them must collapse to
//! the single canonical form `pid:<digits>:null`, which is the dedup and
//! lookup key stored on `products.supplier_product_id`.

/// Collapses an arbitrary supplier product identifier into the canonical
/// `pid:<digits>:null` form.
///
/// Rules are applied in order; the first match wins:
/// 1. the first run of ASCII digits anywhere in the input;
/// 2. the third colon segment of a doubled `pid:pid:...` prefix, if numeric;
/// 3. the second colon segment of a single `pid:` prefix, if numeric;
/// 4. a purely numeric input, wrapped directly;
/// 5. otherwise the input is passed through unmodified — normalization is
///    best-effort, and an unrecognized id fails later at fetch time with a
///    per-item error rather than aborting the batch here.
///
/// The function is pure and idempotent: a canonical id normalizes to itself.
#[must_use]
pub fn canonicalize_product_id(raw: &str) -> String {
    if let Some(digits) = first_digit_run(raw) {
        return wrap(digits);
    }

    let segments: Vec<&str> = raw.split(':').collect();
    if segments.len() >= 3
        && segments[0] == "pid"
        && segments[1] == "pid"
        && is_numeric(segments[2])
    {
        return wrap(segments[2]);
    }
    if segments.len() >= 2 && segments[0] == "pid" && is_numeric(segments[1]) {
        return wrap(segments[1]);
    }
    if is_numeric(raw) {
        return wrap(raw);
    }

    raw.to_string()
}

fn wrap(digits: &str) -> String {
    format!("pid:{digits}:null")
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Returns the first maximal run of ASCII digits in `s`, if any.
fn first_digit_run(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;
    let len = bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    Some(&s[start..start + len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_number_is_wrapped() {
        assert_eq!(canonicalize_product_id("123456"), "pid:123456:null");
    }

    #[test]
    fn canonical_form_is_unchanged() {
        assert_eq!(
            canonicalize_product_id("pid:123456:null"),
            "pid:123456:null"
        );
    }

    #[test]
    fn doubled_prefix_collapses() {
        assert_eq!(
            canonicalize_product_id("pid:pid:789012:null"),
            "pid:789012:null"
        );
    }

    #[test]
    fn number_embedded_in_text_extracts_first_run() {
        assert_eq!(canonicalize_product_id("SKU-4711-rev2"), "pid:4711:null");
    }

    #[test]
    fn input_without_digits_passes_through() {
        assert_eq!(canonicalize_product_id("no-id-here"), "no-id-here");
    }

    #[test]
    fn empty_input_passes_through() {
        assert_eq!(canonicalize_product_id(""), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in [
            "123456",
            "pid:123456:null",
            "pid:pid:789012:null",
            "SKU-4711-rev2",
            "no-id-here",
            "",
        ] {
            let once = canonicalize_product_id(input);
            let twice = canonicalize_product_id(&once);
            assert_eq!(once, twice, "not idempotent for input {input:?}");
        }
    }

    #[test]
    fn first_digit_run_stops_at_non_digit() {
        assert_eq!(first_digit_run("ab12cd34"), Some("12"));
        assert_eq!(first_digit_run("no digits"), None);
    }
}
