//! Shared types for the PALLETBID valuation engine.
//!
//! These types form the data model used across all modules. The valuation
//! core only ever reads them; callers own every `Item` and `Intake`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// Presentation-only category tag attached to a manifest line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CategoryTag {
    #[serde(rename = "Quick Flip")]
    QuickFlip,
    Bulky,
    #[serde(rename = "Bundle Candidate")]
    BundleCandidate,
    #[default]
    Unknown,
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryTag::QuickFlip => write!(f, "Quick Flip"),
            CategoryTag::Bulky => write!(f, "Bulky"),
            CategoryTag::BundleCandidate => write!(f, "Bundle Candidate"),
            CategoryTag::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Presentation-only resale risk tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RiskScore {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskScore::Low => write!(f, "Low"),
            RiskScore::Medium => write!(f, "Medium"),
            RiskScore::High => write!(f, "High"),
        }
    }
}

fn default_include() -> bool {
    true
}

/// A single manifest line as seen by the valuation engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Units on this line (must be positive).
    pub qty: u32,
    /// Estimated resale price per unit.
    pub est_price_each: Decimal,
    /// Whether the line is expected to sell. Missing in input means included.
    #[serde(default = "default_include")]
    pub include: bool,
    #[serde(default)]
    pub category: CategoryTag,
    #[serde(default)]
    pub risk: RiskScore,
    /// Low end of the marketplace resale estimate for the whole line.
    #[serde(default)]
    pub fbm_est_low: Option<Decimal>,
    /// High end of the marketplace resale estimate for the whole line.
    #[serde(default)]
    pub fbm_est_high: Option<Decimal>,
    /// Product-match confidence (0.0–1.0).
    #[serde(default)]
    pub confidence_score: f64,
}

impl Item {
    pub fn new(title: &str, qty: u32, est_price_each: Decimal) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            qty,
            est_price_each,
            include: true,
            category: CategoryTag::Unknown,
            risk: RiskScore::Medium,
            fbm_est_low: None,
            fbm_est_high: None,
            confidence_score: 0.0,
        }
    }

    /// Same item, marked as not expected to sell.
    pub fn excluded(mut self) -> Self {
        self.include = false;
        self
    }

    /// `qty * est_price_each`, regardless of the include flag. Saturates at
    /// [`MAX_MONEY`].
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.qty)
            .checked_mul(self.est_price_each)
            .map_or(MAX_MONEY, |total| total.min(MAX_MONEY))
    }

    /// Boundary check for items arriving from a session file or the API.
    pub fn validate(&self, index: usize) -> Result<(), ValuationError> {
        if self.qty == 0 {
            return Err(ValuationError::InvalidItem {
                index,
                reason: "qty must be a positive integer".to_string(),
            });
        }
        if self.est_price_each < Decimal::ZERO {
            return Err(ValuationError::InvalidItem {
                index,
                reason: format!("est_price_each must be non-negative, got {}", self.est_price_each),
            });
        }
        let exact = Decimal::from(self.qty).checked_mul(self.est_price_each);
        if exact.map_or(true, |total| total > MAX_MONEY) {
            return Err(ValuationError::InvalidItem {
                index,
                reason: format!("line total must not exceed {MAX_MONEY}"),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x{} @ ${:.2} [{}{}]",
            self.title,
            self.qty,
            self.est_price_each,
            self.category,
            if self.include { "" } else { ", excluded" },
        )
    }
}

/// Validate every item, reporting the first failure.
pub fn validate_items(items: &[Item]) -> Result<(), ValuationError> {
    items
        .iter()
        .enumerate()
        .try_for_each(|(index, item)| item.validate(index))
}

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

/// Pallet-level acquisition inputs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Intake {
    #[serde(default)]
    pub shipping_cost: Decimal,
    /// Auction buyer premium, percent of the winning bid (0–100).
    #[serde(default)]
    pub buyer_premium_pct: Decimal,
}

impl Intake {
    pub fn new(shipping_cost: Decimal, buyer_premium_pct: Decimal) -> Self {
        Self {
            shipping_cost,
            buyer_premium_pct,
        }
    }

    /// Negative shipping becomes 0, premium is clamped to [0, 100].
    pub fn normalized(&self) -> Self {
        Self {
            shipping_cost: non_negative(self.shipping_cost),
            buyer_premium_pct: self.buyer_premium_pct.clamp(Decimal::ZERO, dec!(100)),
        }
    }
}

// ---------------------------------------------------------------------------
// Cost configuration
// ---------------------------------------------------------------------------

/// Ceiling for line totals and revenue sums. Keeps every derived figure
/// (scenario revenue, fees, ROI) inside `Decimal` range.
pub const MAX_MONEY: Decimal = dec!(1000000000000000);

/// Upper bound for any single fee or margin percentage.
pub const MAX_PCT: Decimal = dec!(90);

/// Selling-side costs applied on top of the bid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CostConfiguration {
    pub marketplace_fee_pct: Decimal,
    pub payment_fee_pct: Decimal,
    pub flat_fees: Decimal,
    /// Explicit refurbishment total. Wins over the per-item figure when > 0.
    pub refurb_cost_total: Decimal,
    pub refurb_cost_per_item: Decimal,
    pub other_cost: Decimal,
}

impl Default for CostConfiguration {
    fn default() -> Self {
        Self {
            marketplace_fee_pct: dec!(12),
            payment_fee_pct: dec!(3),
            flat_fees: Decimal::ZERO,
            refurb_cost_total: Decimal::ZERO,
            refurb_cost_per_item: Decimal::ZERO,
            other_cost: Decimal::ZERO,
        }
    }
}

impl CostConfiguration {
    /// A configuration with every fee and cost at zero.
    pub fn zero() -> Self {
        Self {
            marketplace_fee_pct: Decimal::ZERO,
            payment_fee_pct: Decimal::ZERO,
            ..Default::default()
        }
    }

    /// Fee percentages clamped to [0, 90], everything else to >= 0.
    pub fn normalized(&self) -> Self {
        Self {
            marketplace_fee_pct: self.marketplace_fee_pct.clamp(Decimal::ZERO, MAX_PCT),
            payment_fee_pct: self.payment_fee_pct.clamp(Decimal::ZERO, MAX_PCT),
            flat_fees: non_negative(self.flat_fees),
            refurb_cost_total: non_negative(self.refurb_cost_total),
            refurb_cost_per_item: non_negative(self.refurb_cost_per_item),
            other_cost: non_negative(self.other_cost),
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Revenue and maximum bid for one named scenario.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScenarioResult {
    pub revenue: Decimal,
    /// May be negative: the target margin is not reachable at this cost structure.
    pub max_bid: Decimal,
}

impl ScenarioResult {
    pub fn is_achievable(&self) -> bool {
        self.max_bid >= Decimal::ZERO
    }
}

/// One sample of the bid sweep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SensitivityPoint {
    pub bid: Decimal,
    /// Rounded to a whole currency unit.
    pub profit: Decimal,
    /// Percent, rounded to one decimal place.
    pub roi: Decimal,
}

impl fmt::Display for SensitivityPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bid ${:>8} | profit ${:>9} | ROI {:>7}%", self.bid, self.profit, self.roi)
    }
}

// ---------------------------------------------------------------------------
// Numeric helpers
// ---------------------------------------------------------------------------

pub(crate) fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Nearest integer, halves rounding toward +infinity (`-2.5 -> -2`, `2.5 -> 3`).
pub fn round_half_up(value: Decimal) -> Decimal {
    (value + dec!(0.5)).floor()
}

/// One decimal place, halves rounding away from zero.
pub fn round_one_decimal(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Boundary errors. The valuation core itself never returns these.
#[derive(Debug, thiserror::Error)]
pub enum ValuationError {
    #[error("Invalid item at index {index}: {reason}")]
    InvalidItem { index: usize, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
