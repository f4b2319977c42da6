//! Cross-tier rebalancing rule.
//!
//! One tier (the cheapest, by default) absorbs a net adjustment driven by
//! oversell in the other tiers: oversell in the "reduction" tiers shrinks
//! it, oversell in the "increase" tiers grows it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{AllocationError, Result};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which tier absorbs the adjustment, which tiers feed it, and how hard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRule {
    pub target_tier: usize,
    /// Oversell here reduces the target tier.
    pub reduction_tiers: Vec<usize>,
    /// Oversell here increases the target tier.
    pub increase_tiers: Vec<usize>,
    pub reduction_factor: f64,
    pub increase_factor: f64,
}

impl Default for AdjustmentRule {
    fn default() -> Self {
        Self {
            target_tier: 0,
            reduction_tiers: vec![1],
            increase_tiers: vec![2, 3],
            reduction_factor: 0.2,
            increase_factor: 0.2,
        }
    }
}

impl AdjustmentRule {
    /// The default four-tier rule with feeders beyond `tier_count` dropped.
    pub fn for_tier_count(tier_count: usize) -> Self {
        let mut rule = Self::default();
        rule.reduction_tiers.retain(|&i| i < tier_count);
        rule.increase_tiers.retain(|&i| i < tier_count);
        rule
    }

    /// Check the rule against the number of configured tiers.
    pub fn validate(&self, tier_count: usize) -> Result<()> {
        if self.target_tier >= tier_count {
            return Err(AllocationError::invalid_input(format!(
                "adjustment target tier {} out of range for {} tiers",
                self.target_tier, tier_count
            )));
        }

        for &i in self.reduction_tiers.iter().chain(&self.increase_tiers) {
            if i >= tier_count {
                return Err(AllocationError::invalid_input(format!(
                    "adjustment feeder tier {i} out of range for {tier_count} tiers"
                )));
            }
            if i == self.target_tier {
                return Err(AllocationError::invalid_input(format!(
                    "tier {i} cannot feed its own adjustment"
                )));
            }
        }

        for (name, factor) in [
            ("reduction_factor", self.reduction_factor),
            ("increase_factor", self.increase_factor),
        ] {
            if !factor.is_finite() || factor < 0.0 {
                return Err(AllocationError::invalid_input(format!(
                    "{name} must be a finite non-negative number, got {factor}"
                )));
            }
        }

        Ok(())
    }

    /// Compute the adjustment from the plan and sales of the batch just observed.
    ///
    /// Both slices must already be validated to the rule's tier count.
    pub fn evaluate(&self, planned: &[u64], last_sales: &[u64]) -> TierAdjustment {
        let oversell = |tiers: &[usize]| -> u64 {
            tiers
                .iter()
                .map(|&i| last_sales[i].saturating_sub(planned[i]))
                .sum()
        };

        let reduction_extra = oversell(&self.reduction_tiers);
        let increase_extra = oversell(&self.increase_tiers);

        // Truncation toward zero; operands are non-negative so this is floor.
        let reduction_adjustment = (reduction_extra as f64 * self.reduction_factor).floor() as i64;
        let increase_adjustment = (increase_extra as f64 * self.increase_factor).floor() as i64;

        let adjustment = TierAdjustment {
            reduction_extra,
            reduction_adjustment,
            increase_extra,
            increase_adjustment,
            net: increase_adjustment - reduction_adjustment,
        };

        debug!(
            target_tier = self.target_tier,
            reduction_extra,
            reduction_adjustment,
            increase_extra,
            increase_adjustment,
            net = adjustment.net,
            "Tier adjustment evaluated"
        );

        adjustment
    }
}

/// Outcome of [`AdjustmentRule::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierAdjustment {
    pub reduction_extra: u64,
    pub reduction_adjustment: i64,
    pub increase_extra: u64,
    pub increase_adjustment: i64,
    pub net: i64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
