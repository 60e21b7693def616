//! Pallet ROI analytics.
//!
//! Summarises a manifest against a candidate bid: resale totals from the
//! marketplace estimates, match quality, and category/risk breakdowns.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::HashMap;

use crate::types::{non_negative, CategoryTag, Item, RiskScore, MAX_MONEY};

/// Items above this confidence count as matched to a product listing.
pub const MATCH_CONFIDENCE_THRESHOLD: f64 = 0.5;
const TOP_ITEMS: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct Breakdown {
    pub count: usize,
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PalletAnalytics {
    pub total_items: usize,
    pub matched_items: usize,
    pub unmatched_items: usize,
    /// Sum of high resale estimates.
    pub gross_resale: Decimal,
    /// Sum of low resale estimates.
    pub low_estimate: Decimal,
    /// Bid plus shipping.
    pub pallet_cost: Decimal,
    pub net_return: Decimal,
    /// 0 when the pallet cost is 0.
    pub roi_pct: Decimal,
    pub category_breakdown: HashMap<CategoryTag, Breakdown>,
    pub risk_breakdown: HashMap<RiskScore, Breakdown>,
    /// Highest-value lines first, at most ten.
    pub top_items: Vec<Item>,
    pub avg_price: Decimal,
    pub match_rate: Decimal,
}

fn bounded(value: Option<Decimal>) -> Decimal {
    non_negative(value.unwrap_or_default()).min(MAX_MONEY)
}

fn high_estimate(item: &Item) -> Decimal {
    bounded(item.fbm_est_high)
}

impl PalletAnalytics {
    pub fn compute(items: &[Item], bid_price: Decimal, shipping_cost: Decimal) -> Self {
        let total_items = items.len();
        let matched_items = items
            .iter()
            .filter(|it| it.confidence_score > MATCH_CONFIDENCE_THRESHOLD)
            .count();

        let gross_resale: Decimal = items.iter().map(high_estimate).sum();
        let low_estimate: Decimal = items.iter().map(|it| bounded(it.fbm_est_low)).sum();

        let pallet_cost = bounded(Some(bid_price)) + bounded(Some(shipping_cost));
        let net_return = gross_resale - pallet_cost;
        let roi_pct = if pallet_cost > Decimal::ZERO {
            net_return / pallet_cost * dec!(100)
        } else {
            Decimal::ZERO
        };

        let mut category_breakdown: HashMap<CategoryTag, Breakdown> = HashMap::new();
        let mut risk_breakdown: HashMap<RiskScore, Breakdown> = HashMap::new();
        for item in items {
            let value = high_estimate(item);
            let entry = category_breakdown.entry(item.category).or_default();
            entry.count += 1;
            entry.value += value;
            let entry = risk_breakdown.entry(item.risk).or_default();
            entry.count += 1;
            entry.value += value;
        }

        let mut top_items = items.to_vec();
        top_items.sort_by(|a, b| high_estimate(b).cmp(&high_estimate(a)));
        top_items.truncate(TOP_ITEMS);

        let (avg_price, match_rate) = if total_items > 0 {
            let n = Decimal::from(total_items);
            (gross_resale / n, Decimal::from(matched_items) / n * dec!(100))
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        Self {
            total_items,
            matched_items,
            unmatched_items: total_items - matched_items,
            gross_resale,
            low_estimate,
            pallet_cost,
            net_return,
            roi_pct,
            category_breakdown,
            risk_breakdown,
            top_items,
            avg_price,
            match_rate,
        }
    }
}
