//! Configuration loading from TOML.
//!
//! Reads `tickcalc.toml` (or a caller-supplied path) and deserializes into
//! strongly-typed structs. `[event]` is required; `[adjustment]` and
//! `[engine]` fall back to the defaults when omitted.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::engine::{AllocationEngine, EngineOptions};
use crate::strategy::AdjustmentRule;
use crate::types::{EventConfig, RoundingMode};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tickcalc.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub event: EventConfig,
    #[serde(default)]
    pub adjustment: AdjustmentConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Overrides for the cross-tier adjustment rule. Anything left out keeps
/// the default four-tier behaviour.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdjustmentConfig {
    pub target_tier: Option<usize>,
    pub reduction_tiers: Option<Vec<usize>>,
    pub increase_tiers: Option<Vec<usize>>,
    pub reduction_factor: Option<f64>,
    pub increase_factor: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub rounding: RoundingMode,
    #[serde(default)]
    pub strict_batch_limit: bool,
}

impl AdjustmentConfig {
    /// Merge the overrides onto the default rule for `tier_count` tiers.
    pub fn to_rule(&self, tier_count: usize) -> AdjustmentRule {
        let base = AdjustmentRule::for_tier_count(tier_count);
        AdjustmentRule {
            target_tier: self.target_tier.unwrap_or(base.target_tier),
            reduction_tiers: self.reduction_tiers.clone().unwrap_or(base.reduction_tiers),
            increase_tiers: self.increase_tiers.clone().unwrap_or(base.increase_tiers),
            reduction_factor: self.reduction_factor.unwrap_or(base.reduction_factor),
            increase_factor: self.increase_factor.unwrap_or(base.increase_factor),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Resolve which config file to use: explicit argument, then the
    /// `TICKCALC_CONFIG` environment variable, then the default name.
    pub fn resolve_path(arg: Option<String>) -> String {
        arg.or_else(|| std::env::var("TICKCALC_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string())
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            adjustment: Some(self.adjustment.to_rule(self.event.tier_count())),
            rounding: self.engine.rounding,
            strict_batch_limit: self.engine.strict_batch_limit,
        }
    }

    /// Construct the engine described by this configuration.
    pub fn build_engine(&self) -> Result<AllocationEngine> {
        AllocationEngine::with_options(self.event.clone(), self.engine_options())
            .context("Invalid event configuration")
    }
}
