//! URL slug derivation for imported products.

use rand::{distr::Alphanumeric, Rng};

const SUFFIX_LEN: usize = 6;

/// Lowercases `name`, collapses every run of non-alphanumeric characters into
/// a single hyphen, and trims leading/trailing hyphens.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Derives a globally unique product slug: the slugified name plus a short
/// random suffix, so uniqueness needs no global counter.
#[must_use]
pub fn product_slug(name: &str) -> String {
    let base = slugify(name);
    let suffix = random_suffix(SUFFIX_LEN);
    if base.is_empty() {
        suffix
    } else {
        format!("{base}-{suffix}")
    }
}

fn random_suffix(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Wireless Earbuds Pro"), "wireless-earbuds-pro");
    }

    #[test]
    fn slugify_collapses_symbol_runs() {
        assert_eq!(slugify("USB-C -- 2m / braided!"), "usb-c-2m-braided");
    }

    #[test]
    fn slugify_trims_edge_hyphens() {
        assert_eq!(slugify("  !!Sale!!  "), "sale");
    }

    #[test]
    fn slugify_empty_and_symbol_only_inputs() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("@#$%"), "");
    }

    #[test]
    fn product_slug_appends_random_suffix() {
        let slug = product_slug("Wireless Earbuds");
        assert!(slug.starts_with("wireless-earbuds-"));
        let suffix = &slug["wireless-earbuds-".len()..];
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!suffix.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn product_slug_for_symbol_only_name_is_just_the_suffix() {
        let slug = product_slug("@#$");
        assert_eq!(slug.len(), SUFFIX_LEN);
        assert!(!slug.contains('-'));
    }

    #[test]
    fn product_slugs_differ_between_calls() {
        // Collision odds over 36^6 are negligible for two draws.
        assert_ne!(product_slug("Widget"), product_slug("Widget"));
    }
}
