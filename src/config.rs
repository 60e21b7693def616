//! Configuration loading from TOML.
//!
//! Reads `palletbid.toml` and deserializes into strongly-typed structs.
//! Out-of-range valuation settings are clamped (with a warning) rather than
//! rejected, matching how the engine treats live inputs.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use tracing::warn;

use crate::storage::DEFAULT_SESSION_FILE;
use crate::types::{CostConfiguration, MAX_PCT};
use crate::valuation::sell_through::DEFAULT_FALLBACK_SELL_THROUGH;
use crate::valuation::ValuationSettings;

/// Default config path, overridable with `PALLETBID_CONFIG`.
pub const DEFAULT_CONFIG_FILE: &str = "palletbid.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub valuation: ValuationSection,
    #[serde(default)]
    pub costs: CostConfiguration,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    pub currency: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "PALLETBID".to_string(),
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ValuationSection {
    pub target_margin_pct: Decimal,
    /// Clamped into [0, 100] by `valuation_settings()`.
    pub fallback_sell_through_pct: i64,
    /// Replaces the suggested sell-through when set.
    pub sell_through_pct: Option<Decimal>,
}

impl Default for ValuationSection {
    fn default() -> Self {
        let defaults = ValuationSettings::default();
        Self {
            target_margin_pct: defaults.target_margin_pct,
            fallback_sell_through_pct: i64::from(defaults.fallback_sell_through_pct),
            sell_through_pct: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_SESSION_FILE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Config path from `PALLETBID_CONFIG`, or the default.
    pub fn resolve_path() -> String {
        std::env::var("PALLETBID_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string())
    }

    /// Valuation settings with every value clamped into range.
    pub fn valuation_settings(&self) -> ValuationSettings {
        let margin = self.valuation.target_margin_pct;
        let target_margin_pct = margin.clamp(Decimal::ZERO, MAX_PCT);
        if target_margin_pct != margin {
            warn!(configured = %margin, used = %target_margin_pct, "target_margin_pct out of range, clamped");
        }

        let costs = self.costs.normalized();
        if costs != self.costs {
            warn!("Cost configuration contained out-of-range values, clamped");
        }

        let fallback = self.valuation.fallback_sell_through_pct;
        let clamped = fallback.clamp(0, 100);
        if clamped != fallback {
            warn!(configured = fallback, used = clamped, "fallback_sell_through_pct out of range, clamped");
        }
        let fallback_sell_through_pct = u8::try_from(clamped).unwrap_or(DEFAULT_FALLBACK_SELL_THROUGH);

        ValuationSettings {
            target_margin_pct,
            costs,
            fallback_sell_through_pct,
        }
    }
}
