//! Valuation engine — sell-through, revenue, max-bid scenarios, and the
//! bid-sensitivity curve.
//!
//! Every function here is a pure function of its arguments. Callers hold
//! whatever state they need (selected items, edited sell-through) and pass
//! it in explicitly.

pub mod costs;
pub mod max_bid;
pub mod revenue;
pub mod scenario;
pub mod sell_through;
pub mod sensitivity;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::types::{round_half_up, CostConfiguration, Intake, Item, SensitivityPoint};
use costs::{cost_breakdown, CostBreakdown};
use max_bid::{MaxBidCalculator, DEFAULT_TARGET_MARGIN_PCT};
use scenario::{Scenario, ScenarioSet};
use sell_through::{clamp_sell_through, default_sell_through, DEFAULT_FALLBACK_SELL_THROUGH};
use sensitivity::{build_sensitivity_from_revenue, SensitivitySummary};

pub use max_bid::compute_scenarios;
pub use revenue::estimated_revenue;
pub use sell_through::suggested_sell_through;
pub use sensitivity::build_sensitivity;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Caller-side valuation knobs (from config or a request).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValuationSettings {
    pub target_margin_pct: Decimal,
    pub costs: CostConfiguration,
    /// Used when no item is flagged as included.
    pub fallback_sell_through_pct: u8,
}

impl Default for ValuationSettings {
    fn default() -> Self {
        Self {
            target_margin_pct: DEFAULT_TARGET_MARGIN_PCT,
            costs: CostConfiguration::default(),
            fallback_sell_through_pct: DEFAULT_FALLBACK_SELL_THROUGH,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything the analysis view shows for one pallet.
#[derive(Debug, Clone, Serialize)]
pub struct ValuationReport {
    /// Manifest lines; drives per-item refurb cost.
    pub item_count: u32,
    pub unit_count: u64,
    pub sell_through_pct: u8,
    pub suggested_sell_through_pct: u8,
    pub estimated_revenue: Decimal,
    pub target_margin_pct: Decimal,
    pub scenarios: ScenarioSet,
    /// Non-bid costs at the Likely scenario's revenue.
    pub likely_costs: CostBreakdown,
    pub sensitivity: Vec<SensitivityPoint>,
    pub summary: SensitivitySummary,
}

impl ValuationReport {
    /// Run the full pipeline. `sell_through_override` replaces the suggested
    /// sell-through (after rounding and clamping).
    pub fn build(
        items: &[Item],
        intake: &Intake,
        settings: &ValuationSettings,
        sell_through_override: Option<Decimal>,
    ) -> Self {
        let suggested = suggested_sell_through(items);
        let sell_through_pct = match sell_through_override {
            Some(raw) => clamp_sell_through(raw),
            None => default_sell_through(items, settings.fallback_sell_through_pct),
        };

        let est_revenue = estimated_revenue(items, Decimal::from(sell_through_pct));
        let item_count = u32::try_from(items.len()).unwrap_or(u32::MAX);
        let unit_count: u64 = items.iter().map(|it| u64::from(it.qty)).sum();
        let shipping = intake.normalized().shipping_cost;

        let calculator = MaxBidCalculator::new(settings.target_margin_pct);
        let scenarios = calculator.compute(est_revenue, &settings.costs, shipping, item_count);
        let likely_costs = cost_breakdown(
            est_revenue * Scenario::Likely.factor(),
            &settings.costs,
            shipping,
            item_count,
        );

        let sensitivity = build_sensitivity_from_revenue(est_revenue, intake);
        let summary = SensitivitySummary::from_curve(est_revenue, &sensitivity);

        info!(
            items = items.len(),
            sell_through_pct,
            est_revenue = %round_half_up(est_revenue),
            likely_max_bid = %round_half_up(scenarios.likely.max_bid),
            break_even_bid = ?summary.break_even_bid,
            "Valuation report built"
        );

        Self {
            item_count,
            unit_count,
            sell_through_pct,
            suggested_sell_through_pct: suggested,
            estimated_revenue: est_revenue,
            target_margin_pct: calculator.target_margin_pct(),
            scenarios,
            likely_costs,
            sensitivity,
            summary,
        }
    }
}

impl fmt::Display for ValuationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Lines: {} | Units: {} | Sell-through: {}% (suggested {}%) | Est. revenue: ${}",
            self.item_count,
            self.unit_count,
            self.sell_through_pct,
            self.suggested_sell_through_pct,
            self.summary.estimated_revenue,
        )?;
        writeln!(f, "Max bid @ {}% target margin:", self.target_margin_pct)?;
        for (scenario, result) in self.scenarios.iter() {
            writeln!(
                f,
                "  {:<13} ({:>4})  revenue ${:>10}  max bid ${:>10}{}",
                scenario.label(),
                scenario.adjustment_label(),
                round_half_up(result.revenue),
                round_half_up(result.max_bid),
                if result.is_achievable() { "" } else { "  (target margin not achievable)" },
            )?;
        }
        writeln!(f, "Non-bid costs (Likely): ${}", round_half_up(self.likely_costs.total))?;
        match self.summary.break_even_bid {
            Some(bid) => writeln!(
                f,
                "Break-even bid: ~${} (±${} resolution)",
                bid, self.summary.bounds.step
            )?,
            None => writeln!(f, "Break-even bid: n/a")?,
        }
        for point in &self.sensitivity {
            writeln!(f, "  {point}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
