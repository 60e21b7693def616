//! Expected revenue at a given sell-through.
//!
//! This is the one place "expected revenue" is computed; the scenario
//! table and the sensitivity curve both start from it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Item, MAX_MONEY};

/// Sum of line totals for included items, saturating at [`MAX_MONEY`].
pub fn included_revenue(items: &[Item]) -> Decimal {
    items
        .iter()
        .filter(|it| it.include)
        .map(Item::line_total)
        .fold(Decimal::ZERO, |acc, line| {
            acc.checked_add(line).map_or(MAX_MONEY, |sum| sum.min(MAX_MONEY))
        })
}

/// Included line totals scaled by `sell_through_pct` (clamped to [0, 100]).
pub fn estimated_revenue(items: &[Item], sell_through_pct: Decimal) -> Decimal {
    let pct = sell_through_pct.clamp(Decimal::ZERO, dec!(100));
    included_revenue(items) * (pct / dec!(100))
}
