//! Dynamic allocation suggestion.
//!
//! After a batch is observed, recompute the per-tier plan for the next one:
//!
//! 1. Next batch size = min(first batch total, tickets left under the cap).
//! 2. Base plan = configured percentages of that size.
//! 3. Unsold planned tickets roll over into their own tier.
//! 4. The adjustment tier reacts to oversell elsewhere (see
//!    [`AdjustmentRule`](crate::strategy::AdjustmentRule)).
//! 5. Shrink everything proportionally if it no longer fits the batch.
//! 6. Drop the cheapest tier if the average price still needed to hit the
//!    revenue target is above it, and spread its share over the others.
//! 7. Round per tier and commit as the new plan.

use tracing::{debug, info, warn};

use super::AllocationEngine;
use crate::strategy::feasibility;
use crate::types::{AllocationError, Result, SuggestionResult};

impl AllocationEngine {
    /// Compute the next batch's allocation and make it the current plan.
    ///
    /// Fails with `DivisionDegenerate` when no tickets are left under the
    /// global cap, or when the cheapest tier must be cut but no other tier
    /// has anything to scale. On failure the plan is left as it was.
    pub fn dynamic_allocation_suggestion(&mut self) -> Result<SuggestionResult> {
        let result = self.preview_suggestion()?;
        self.planned = result.committed.clone();

        info!(
            next_batch_total = result.next_batch_total,
            committed = ?result.committed,
            committed_total = result.committed_total(),
            net_adjustment = result.net_adjustment,
            cheapest_tier_cut = result.cheapest_tier_cut,
            "Next batch allocation committed"
        );

        Ok(result)
    }

    /// Run the suggestion pass without touching the engine.
    pub fn preview_suggestion(&self) -> Result<SuggestionResult> {
        let n = self.config.tier_count();

        // 1. Next batch size
        let remaining = self.remaining_tickets_global();
        let next_total = (self.config.first_batch_total as i64).min(remaining);
        if next_total <= 0 {
            warn!(
                remaining_tickets = remaining,
                first_batch_total = self.config.first_batch_total,
                "No tickets left for another batch"
            );
            return Err(AllocationError::division_degenerate(
                "next batch total",
                next_total as f64,
            ));
        }
        let next_total = next_total as u64;

        // 2. Base plan
        let base_planned: Vec<f64> = self
            .config
            .allocation_percentages
            .iter()
            .map(|pct| pct / 100.0 * next_total as f64)
            .collect();

        // 3. Rollover
        let rollover: Vec<u64> = self
            .planned
            .iter()
            .zip(&self.last_batch_sales)
            .map(|(&planned, &sold)| planned.saturating_sub(sold))
            .collect();

        // 4. Adjustment tier
        let adjustment = self.rule.evaluate(&self.planned, &self.last_batch_sales);
        let target = self.rule.target_tier;

        let mut suggested: Vec<f64> = (0..n)
            .map(|i| {
                if i == target {
                    (base_planned[i] + adjustment.net as f64).max(0.0)
                } else {
                    base_planned[i] + rollover[i] as f64
                }
            })
            .collect();

        debug!(?base_planned, ?rollover, ?suggested, "Pre-cap suggestion");

        // 5. Fit to batch size
        feasibility::cap_to_batch(&mut suggested, next_total);

        // 6. Price floor
        let required_avg = feasibility::required_average(self.remaining_revenue(), next_total);
        let cheapest = self.config.tiers[0];
        let cheapest_tier_cut = required_avg > cheapest;
        if cheapest_tier_cut {
            warn!(
                required_avg = format!("${:.2}", required_avg),
                cheapest = format!("${:.2}", cheapest),
                "Required average price is above the cheapest tier"
            );
            feasibility::cut_cheapest_tier(&mut suggested, next_total)?;
        }

        // 7. Percentages and rounding
        let new_percentages = feasibility::percentages(&suggested);
        let committed: Vec<u64> = suggested
            .iter()
            .map(|&alloc| self.rounding.apply(alloc).max(0.0) as u64)
            .collect();

        Ok(SuggestionResult {
            next_batch_total: next_total,
            tiers: self.config.tiers.clone(),
            base_planned,
            rollover,
            adjusted_tier: target,
            reduction_extra: adjustment.reduction_extra,
            reduction_adjustment: adjustment.reduction_adjustment,
            increase_extra: adjustment.increase_extra,
            increase_adjustment: adjustment.increase_adjustment,
            net_adjustment: adjustment.net,
            required_avg,
            cheapest_tier_cut,
            suggested,
            committed,
            new_percentages,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
