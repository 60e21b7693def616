//! Maximum sustainable bid per scenario.
//!
//! `max_bid = R * (1 - g/100) - non_bid_costs(R)`, where `R` is the
//! scenario-scaled revenue and `g` the target gross margin. Each scenario
//! gets its own non-bid costs because percentage fees scale with `R`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::costs::non_bid_costs;
use super::scenario::{Scenario, ScenarioSet};
use crate::types::{CostConfiguration, ScenarioResult, MAX_PCT};

/// Default target gross margin, percent.
pub const DEFAULT_TARGET_MARGIN_PCT: Decimal = dec!(30);

pub struct MaxBidCalculator {
    target_margin_pct: Decimal,
}

impl Default for MaxBidCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_MARGIN_PCT)
    }
}

impl MaxBidCalculator {
    /// Target margin is clamped to [0, 90].
    pub fn new(target_margin_pct: Decimal) -> Self {
        Self {
            target_margin_pct: target_margin_pct.clamp(Decimal::ZERO, MAX_PCT),
        }
    }

    pub fn target_margin_pct(&self) -> Decimal {
        self.target_margin_pct
    }

    /// Highest bid that still leaves the target margin. Negative results are
    /// returned as-is.
    pub fn max_bid(&self, revenue: Decimal, non_bid: Decimal) -> Decimal {
        revenue * (Decimal::ONE - self.target_margin_pct / dec!(100)) - non_bid
    }

    /// Revenue and max bid for one scenario.
    pub fn scenario(
        &self,
        scenario: Scenario,
        base_revenue: Decimal,
        costs: &CostConfiguration,
        shipping_cost: Decimal,
        item_count: u32,
    ) -> ScenarioResult {
        let revenue = base_revenue * scenario.factor();
        let non_bid = non_bid_costs(revenue, costs, shipping_cost, item_count);
        let max_bid = self.max_bid(revenue, non_bid);

        if max_bid < Decimal::ZERO {
            debug!(
                scenario = %scenario,
                revenue = %revenue,
                non_bid = %non_bid,
                max_bid = %max_bid,
                target_margin_pct = %self.target_margin_pct,
                "Target margin not achievable"
            );
        }

        ScenarioResult { revenue, max_bid }
    }

    /// Evaluate all three scenarios.
    pub fn compute(
        &self,
        base_revenue: Decimal,
        costs: &CostConfiguration,
        shipping_cost: Decimal,
        item_count: u32,
    ) -> ScenarioSet {
        ScenarioSet::from_fn(|s| self.scenario(s, base_revenue, costs, shipping_cost, item_count))
    }
}

/// Scenario table for a base revenue estimate.
pub fn compute_scenarios(
    base_revenue: Decimal,
    target_margin_pct: Decimal,
    costs: &CostConfiguration,
    shipping_cost: Decimal,
    item_count: u32,
) -> ScenarioSet {
    MaxBidCalculator::new(target_margin_pct).compute(base_revenue, costs, shipping_cost, item_count)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
