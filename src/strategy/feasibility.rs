//! Batch-size capping and the price-floor check.
//!
//! Suggested allocations are shrunk proportionally so they never exceed
//! the next batch, and the cheapest tier is dropped when the average
//! price still needed to reach the revenue target is above it.

use rust_decimal::prelude::*;
use tracing::{debug, warn};

use crate::types::{AllocationError, Result};

/// Scale `suggested` down so it sums to `batch_total` if it currently
/// exceeds it. Returns true when scaling happened.
pub fn cap_to_batch(suggested: &mut [f64], batch_total: u64) -> bool {
    let total: f64 = suggested.iter().sum();
    let cap = batch_total as f64;

    if total <= cap || total <= 0.0 {
        return false;
    }

    let scale = cap / total;
    for alloc in suggested.iter_mut() {
        *alloc *= scale;
    }

    debug!(before = total, after = cap, scale, "Suggested allocations capped to batch size");
    true
}

/// Average ticket price needed over the next batch to close the revenue gap.
///
/// Zero when the batch is empty.
pub fn required_average(remaining_revenue: Decimal, batch_total: u64) -> Decimal {
    if batch_total == 0 {
        Decimal::ZERO
    } else {
        remaining_revenue / Decimal::from(batch_total)
    }
}

/// Zero out tier 0 and rescale the remaining tiers so they fill the batch.
///
/// Fails when the remaining tiers have nothing to scale.
pub fn cut_cheapest_tier(suggested: &mut [f64], batch_total: u64) -> Result<()> {
    let Some((cheapest, rest)) = suggested.split_first_mut() else {
        return Err(AllocationError::division_degenerate("price-floor rescale", 0.0));
    };

    let rest_total: f64 = rest.iter().sum();
    if rest_total <= 0.0 {
        return Err(AllocationError::division_degenerate(
            "price-floor rescale",
            rest_total,
        ));
    }

    *cheapest = 0.0;
    let scale = batch_total as f64 / rest_total;
    for alloc in rest.iter_mut() {
        *alloc *= scale;
    }

    warn!(batch_total, scale, "Cheapest tier cut from next batch");
    Ok(())
}

/// Share of each allocation in the total, in percent. All zeros when the
/// total is zero.
pub fn percentages(allocations: &[f64]) -> Vec<f64> {
    let total: f64 = allocations.iter().sum();
    allocations
        .iter()
        .map(|a| if total != 0.0 { a / total * 100.0 } else { 0.0 })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
