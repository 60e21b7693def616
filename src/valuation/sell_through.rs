//! Sell-through suggestion from item inclusion flags.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::types::{round_half_up, Item};

/// Used when the suggestion comes out at 0%.
pub const DEFAULT_FALLBACK_SELL_THROUGH: u8 = 80;

/// Share of units flagged as included, as a whole percentage.
/// An empty manifest counts as fully included (100).
pub fn suggested_sell_through(items: &[Item]) -> u8 {
    let total: u64 = items.iter().map(|it| u64::from(it.qty)).sum();
    if total == 0 {
        return 100;
    }
    let included: u64 = items
        .iter()
        .filter(|it| it.include)
        .map(|it| u64::from(it.qty))
        .sum();

    let pct = Decimal::from(included) / Decimal::from(total) * dec!(100);
    round_half_up(pct).to_u8().unwrap_or(100)
}

/// Round and clamp a user-edited sell-through into [0, 100].
pub fn clamp_sell_through(raw: Decimal) -> u8 {
    round_half_up(raw)
        .clamp(Decimal::ZERO, dec!(100))
        .to_u8()
        .unwrap_or(0)
}

/// The suggestion, or `fallback` when nothing is included.
pub fn default_sell_through(items: &[Item], fallback: u8) -> u8 {
    match suggested_sell_through(items) {
        0 => fallback.min(100),
        pct => pct,
    }
}
