//! Non-bid cost aggregation.
//!
//! Everything a reseller pays besides the winning bid: shipping, flat
//! fees, refurbishment, other costs, and marketplace/payment fees charged
//! as a percentage of revenue. Raw inputs are normalised first, so the
//! result is always a usable number.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

use crate::types::{non_negative, CostConfiguration};

/// Combined percentage fees never exceed 90% of revenue.
const MAX_FEE_RATE: Decimal = dec!(0.9);

/// Components of the non-bid cost figure.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct CostBreakdown {
    pub percent_fees: Decimal,
    pub refurb_total: Decimal,
    /// Shipping + flat fees + other costs.
    pub fixed_costs: Decimal,
    pub total: Decimal,
}

/// Marketplace + payment fee as a fraction of revenue, clamped to [0, 0.9].
pub fn percent_fee_rate(costs: &CostConfiguration) -> Decimal {
    let costs = costs.normalized();
    ((costs.marketplace_fee_pct + costs.payment_fee_pct) / dec!(100))
        .clamp(Decimal::ZERO, MAX_FEE_RATE)
}

/// Explicit total when positive, otherwise per-item cost times item count.
pub fn refurb_total(costs: &CostConfiguration, item_count: u32) -> Decimal {
    let costs = costs.normalized();
    if costs.refurb_cost_total > Decimal::ZERO {
        costs.refurb_cost_total
    } else {
        costs.refurb_cost_per_item * Decimal::from(item_count)
    }
}

/// Full breakdown of non-bid costs at the given revenue.
pub fn cost_breakdown(
    revenue: Decimal,
    costs: &CostConfiguration,
    shipping_cost: Decimal,
    item_count: u32,
) -> CostBreakdown {
    let normalized = costs.normalized();
    let revenue = non_negative(revenue);

    let percent_fees = revenue * percent_fee_rate(&normalized);
    let refurb_total = refurb_total(&normalized, item_count);
    let fixed_costs = non_negative(shipping_cost) + normalized.flat_fees + normalized.other_cost;
    let total = fixed_costs + refurb_total + percent_fees;

    debug!(
        revenue = %revenue,
        percent_fees = %percent_fees,
        refurb_total = %refurb_total,
        fixed_costs = %fixed_costs,
        total = %total,
        "Non-bid costs aggregated"
    );

    CostBreakdown {
        percent_fees,
        refurb_total,
        fixed_costs,
        total,
    }
}

/// `shipping + flat fees + refurb + other + percentage fees`.
pub fn non_bid_costs(
    revenue: Decimal,
    costs: &CostConfiguration,
    shipping_cost: Decimal,
    item_count: u32,
) -> Decimal {
    cost_breakdown(revenue, costs, shipping_cost, item_count).total
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worked_example() {
        let costs = CostConfiguration::default();
        let b = cost_breakdown(dec!(10000), &costs, dec!(200), 10);
        assert_eq!(b.percent_fees, dec!(1500));
        assert_eq!(b.refurb_total, Decimal::ZERO);
        assert_eq!(b.fixed_costs, dec!(200));
        assert_eq!(b.total, dec!(1700));
    }

    #[test]
    fn test_fee_rate_clamped_to_ninety_percent() {
        let costs = CostConfiguration {
            marketplace_fee_pct: dec!(80),
            payment_fee_pct: dec!(50),
            ..CostConfiguration::zero()
        };
        assert_eq!(percent_fee_rate(&costs), dec!(0.9));
        assert_eq!(non_bid_costs(dec!(1000), &costs, Decimal::ZERO, 0), dec!(900));
    }

    #[test]
    fn test_refurb_total_overrides_per_item() {
        let costs = CostConfiguration {
            refurb_cost_total: dec!(50),
            refurb_cost_per_item: dec!(1000),
            ..CostConfiguration::zero()
        };
        assert_eq!(refurb_total(&costs, 500), dec!(50));
    }

    #[test]
    fn test_refurb_per_item_fallback() {
        let costs = CostConfiguration {
            refurb_cost_per_item: dec!(2.5),
            ..CostConfiguration::zero()
        };
        assert_eq!(refurb_total(&costs, 12), dec!(30));
    }

    #[test]
    fn test_negative_inputs_clamped() {
        let costs = CostConfiguration {
            marketplace_fee_pct: dec!(-10),
            payment_fee_pct: dec!(-10),
            flat_fees: dec!(-100),
            refurb_cost_total: dec!(-5),
            refurb_cost_per_item: dec!(-5),
            other_cost: dec!(-1),
        };
        assert_eq!(non_bid_costs(dec!(1000), &costs, dec!(-20), 4), Decimal::ZERO);
    }

    #[test]
    fn test_monotonic_in_each_cost() {
        let base = CostConfiguration::default();
        let revenue = dec!(5000);
        let before = non_bid_costs(revenue, &base, dec!(100), 5);

        let bumps = [
            CostConfiguration { marketplace_fee_pct: base.marketplace_fee_pct + dec!(1), ..base },
            CostConfiguration { payment_fee_pct: base.payment_fee_pct + dec!(1), ..base },
            CostConfiguration { flat_fees: dec!(10), ..base },
            CostConfiguration { refurb_cost_total: dec!(10), ..base },
            CostConfiguration { refurb_cost_per_item: dec!(1), ..base },
            CostConfiguration { other_cost: dec!(10), ..base },
        ];
        for bumped in bumps {
            assert!(non_bid_costs(revenue, &bumped, dec!(100), 5) >= before);
        }
        assert!(non_bid_costs(revenue, &base, dec!(150), 5) >= before);
        assert!(non_bid_costs(dec!(6000), &base, dec!(100), 5) >= before);
    }
}
