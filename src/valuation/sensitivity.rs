//! Bid-sensitivity curve.
//!
//! Sweeps bids from 0 up to a revenue-derived ceiling and reports profit
//! and ROI at each step. The sweep is coarse by construction: at most
//! about 50 samples, never closer than 25 currency units apart.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

use super::revenue::estimated_revenue;
use crate::types::{round_half_up, round_one_decimal, Intake, Item, SensitivityPoint};

/// Lower bound for the sweep ceiling, so near-zero manifests still get a range.
const MIN_SWEEP_CEILING: Decimal = dec!(2000);
/// Ceiling as a share of estimated revenue.
const CEILING_REVENUE_SHARE: Decimal = dec!(0.9);
const TARGET_SAMPLES: Decimal = dec!(50);
const MIN_STEP: Decimal = dec!(25);

/// Range and resolution of a bid sweep.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SweepBounds {
    pub max_bid: Decimal,
    pub step: Decimal,
}

impl SweepBounds {
    /// Number of samples: `floor(max_bid / step) + 1`.
    pub fn point_count(&self) -> usize {
        let mut count = 0;
        let mut bid = Decimal::ZERO;
        while bid <= self.max_bid {
            count += 1;
            bid += self.step;
        }
        count
    }
}

pub fn sweep_bounds(est_revenue: Decimal) -> SweepBounds {
    let max_bid = MIN_SWEEP_CEILING.max(round_half_up(est_revenue * CEILING_REVENUE_SHARE));
    let step = MIN_STEP.max(round_half_up(max_bid / TARGET_SAMPLES));
    SweepBounds { max_bid, step }
}

/// Profit and ROI at a single bid.
pub fn evaluate_bid(est_revenue: Decimal, intake: &Intake, bid: Decimal) -> SensitivityPoint {
    let intake = intake.normalized();
    let premium = intake.buyer_premium_pct / dec!(100) * bid;
    let total_cost = bid + intake.shipping_cost + premium;
    let profit = est_revenue - total_cost;
    let roi = if total_cost > Decimal::ZERO {
        profit / total_cost * dec!(100)
    } else {
        Decimal::ZERO
    };

    SensitivityPoint {
        bid,
        profit: round_half_up(profit),
        roi: round_one_decimal(roi),
    }
}

/// Sweep for a precomputed revenue estimate.
pub fn build_sensitivity_from_revenue(est_revenue: Decimal, intake: &Intake) -> Vec<SensitivityPoint> {
    let bounds = sweep_bounds(est_revenue);
    let mut points = Vec::with_capacity(bounds.point_count());

    let mut bid = Decimal::ZERO;
    while bid <= bounds.max_bid {
        points.push(evaluate_bid(est_revenue, intake, bid));
        bid += bounds.step;
    }

    debug!(
        est_revenue = %est_revenue,
        max_bid = %bounds.max_bid,
        step = %bounds.step,
        points = points.len(),
        "Sensitivity curve built"
    );

    points
}

/// Profit/ROI curve across the bid range for these items.
pub fn build_sensitivity(items: &[Item], intake: &Intake, sell_through_pct: Decimal) -> Vec<SensitivityPoint> {
    build_sensitivity_from_revenue(estimated_revenue(items, sell_through_pct), intake)
}

/// Sampled bid whose profit is closest to zero. The first sample wins ties.
/// Resolution is the sweep step; no interpolation between samples.
pub fn break_even_bid(points: &[SensitivityPoint]) -> Option<Decimal> {
    let mut best: Option<&SensitivityPoint> = None;
    for point in points {
        match best {
            Some(b) if point.profit.abs() >= b.profit.abs() => {}
            _ => best = Some(point),
        }
    }
    best.map(|p| p.bid)
}

/// Largest sampled bid that still breaks even or better.
pub fn highest_profitable_bid(points: &[SensitivityPoint]) -> Option<Decimal> {
    points
        .iter()
        .filter(|p| p.profit >= Decimal::ZERO)
        .map(|p| p.bid)
        .max()
}

/// Headline figures for a curve.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SensitivitySummary {
    /// Rounded to a whole currency unit.
    pub estimated_revenue: Decimal,
    pub bounds: SweepBounds,
    pub break_even_bid: Option<Decimal>,
    pub highest_profitable_bid: Option<Decimal>,
    pub max_profit: Option<Decimal>,
    pub max_roi: Option<Decimal>,
}

impl SensitivitySummary {
    pub fn from_curve(est_revenue: Decimal, points: &[SensitivityPoint]) -> Self {
        Self {
            estimated_revenue: round_half_up(est_revenue),
            bounds: sweep_bounds(est_revenue),
            break_even_bid: break_even_bid(points),
            highest_profitable_bid: highest_profitable_bid(points),
            max_profit: points.iter().map(|p| p.profit).max(),
            max_roi: points.iter().map(|p| p.roi).max(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn worked_intake() -> Intake {
        Intake::new(dec!(50), dec!(10))
    }

    #[test]
    fn test_worked_example_bounds() {
        let bounds = sweep_bounds(dec!(1000));
        assert_eq!(bounds.max_bid, dec!(2000));
        assert_eq!(bounds.step, dec!(40));
        assert_eq!(bounds.point_count(), 51);
    }

    #[test]
    fn test_worked_example_endpoints() {
        let points = build_sensitivity_from_revenue(dec!(1000), &worked_intake());
        let first = points.first().unwrap();
        assert_eq!(first.bid, Decimal::ZERO);
        assert_eq!(first.profit, dec!(950));
        assert_eq!(first.roi, dec!(1900.0));

        let last = points.last().unwrap();
        assert_eq!(last.bid, dec!(2000));
        assert_eq!(last.profit, dec!(-1250));
        assert_eq!(last.roi, dec!(-55.6));
    }

    #[test]
    fn test_large_revenue_scales_ceiling() {
        let bounds = sweep_bounds(dec!(10000));
        assert_eq!(bounds.max_bid, dec!(9000));
        assert_eq!(bounds.step, dec!(180));
    }

    #[test]
    fn test_step_floor_of_25() {
        // ceiling 2000 -> 40; can't go below 25 since ceiling >= 2000
        assert!(sweep_bounds(Decimal::ZERO).step >= dec!(25));
    }

    #[test]
    fn test_zero_cost_roi_is_zero() {
        let p = evaluate_bid(dec!(500), &Intake::default(), Decimal::ZERO);
        assert_eq!(p.profit, dec!(500));
        assert_eq!(p.roi, Decimal::ZERO);
    }

    #[test]
    fn test_break_even_nearest_zero() {
        let points = build_sensitivity_from_revenue(dec!(1000), &worked_intake());
        // profit = 950 - 1.1 * bid; zero near bid 863.6, nearest sample 880 (profit -18)
        assert_eq!(break_even_bid(&points), Some(dec!(880)));
    }

    #[test]
    fn test_break_even_first_wins_ties() {
        let points = vec![
            SensitivityPoint { bid: dec!(0), profit: dec!(10), roi: Decimal::ZERO },
            SensitivityPoint { bid: dec!(25), profit: dec!(-10), roi: Decimal::ZERO },
        ];
        assert_eq!(break_even_bid(&points), Some(Decimal::ZERO));
        assert_eq!(break_even_bid(&[]), None);
    }

    #[test]
    fn test_highest_profitable_bid() {
        let points = build_sensitivity_from_revenue(dec!(1000), &worked_intake());
        // 950 - 1.1 * 840 = 26
        assert_eq!(highest_profitable_bid(&points), Some(dec!(840)));
    }

    #[test]
    fn test_summary() {
        let points = build_sensitivity_from_revenue(dec!(1000.4), &worked_intake());
        let summary = SensitivitySummary::from_curve(dec!(1000.4), &points);
        assert_eq!(summary.estimated_revenue, dec!(1000));
        assert_eq!(summary.max_profit, Some(dec!(950)));
        assert_eq!(summary.bounds.step, dec!(40));
    }
}
