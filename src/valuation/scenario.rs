//! Named revenue scenarios.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::ScenarioResult;

/// The three fixed revenue scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    Conservative,
    Likely,
    Aggressive,
}

impl Scenario {
    /// Display order.
    pub const ALL: [Scenario; 3] = [Scenario::Conservative, Scenario::Likely, Scenario::Aggressive];

    /// Multiplier applied to the base revenue estimate.
    pub fn factor(self) -> Decimal {
        match self {
            Scenario::Conservative => dec!(0.85),
            Scenario::Likely => dec!(1.00),
            Scenario::Aggressive => dec!(1.10),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Scenario::Conservative => "Conservative",
            Scenario::Likely => "Likely",
            Scenario::Aggressive => "Aggressive",
        }
    }

    /// Signed adjustment shown next to the label.
    pub fn adjustment_label(self) -> &'static str {
        match self {
            Scenario::Conservative => "−15%",
            Scenario::Likely => "±0%",
            Scenario::Aggressive => "+10%",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One result per scenario.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScenarioSet {
    pub conservative: ScenarioResult,
    pub likely: ScenarioResult,
    pub aggressive: ScenarioResult,
}

impl ScenarioSet {
    /// Build the set by evaluating `f` once per scenario.
    pub fn from_fn(mut f: impl FnMut(Scenario) -> ScenarioResult) -> Self {
        Self {
            conservative: f(Scenario::Conservative),
            likely: f(Scenario::Likely),
            aggressive: f(Scenario::Aggressive),
        }
    }

    pub fn get(&self, scenario: Scenario) -> &ScenarioResult {
        match scenario {
            Scenario::Conservative => &self.conservative,
            Scenario::Likely => &self.likely,
            Scenario::Aggressive => &self.aggressive,
        }
    }

    /// Results in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Scenario, &ScenarioResult)> + '_ {
        Scenario::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}
