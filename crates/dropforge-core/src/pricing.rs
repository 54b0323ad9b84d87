//! Retail price derivation from supplier cost and markup policy.
//!
//! All money math is `rust_decimal::Decimal`; rounding is always *up* to the
//! cent so the derived retail price never undercharges relative to the markup
//! target.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fallback markup (30%) applied when the caller supplies no markup or an
/// unusable one.
#[must_use]
pub fn default_markup() -> Decimal {
    Decimal::new(3, 1)
}

/// Upper bound of the accepted markup range (500%).
fn max_markup() -> Decimal {
    Decimal::from(5)
}

/// Additional markup applied on top of the sell price to derive the displayed
/// "was" price (50 percentage points).
fn compare_at_bump() -> Decimal {
    Decimal::new(5, 1)
}

/// Resolves the effective markup from a raw JSON value.
///
/// Accepts a fractional number in `[0, 5]` (e.g. `0.3` = 30%). Anything else
/// — absent, non-numeric (`"abc"`), negative, or above 5 — resolves to
/// [`default_markup`].
#[must_use]
pub fn resolve_markup(raw: Option<&serde_json::Value>) -> Decimal {
    let candidate = raw.and_then(serde_json::Value::as_f64).and_then(Decimal::from_f64);
    match candidate {
        Some(m) if m >= Decimal::ZERO && m <= max_markup() => m,
        _ => default_markup(),
    }
}

/// Derives the retail sell price: `cost * (1 + markup)`, rounded up to the cent.
#[must_use]
pub fn sell_price(cost: Decimal, markup: Decimal) -> Decimal {
    ceil_to_cent(cost * (Decimal::ONE + markup))
}

/// Derives the displayed compare-at price: `cost * (1 + markup + 0.5)`,
/// rounded up to the cent.
///
/// Purely a "was" price for discount display; with the same rounding
/// direction as [`sell_price`] it is always `>=` the sell price.
#[must_use]
pub fn compare_at_price(cost: Decimal, markup: Decimal) -> Decimal {
    ceil_to_cent(cost * (Decimal::ONE + markup + compare_at_bump()))
}

fn ceil_to_cent(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity)
}
