//! Batch ledger: append-only sales records and running totals.
//!
//! Each recorded batch adds its revenue to the cumulative figure and its
//! per-tier counts to the cumulative sales. Nothing is ever removed.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::types::{AllocationError, Batch, Result};

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    batches: Vec<Batch>,
    cumulative_sales: Vec<u64>,
    cumulative_revenue: Decimal,
}

impl Ledger {
    pub fn new(tier_count: usize) -> Self {
        Self {
            batches: Vec::new(),
            cumulative_sales: vec![0; tier_count],
            cumulative_revenue: Decimal::ZERO,
        }
    }

    /// Σ sales[i] × tiers[i], or `None` if it does not fit a `Decimal`.
    /// Slices must be the same length.
    pub fn batch_revenue(tiers: &[Decimal], sales: &[u64]) -> Option<Decimal> {
        tiers
            .iter()
            .zip(sales)
            .try_fold(Decimal::ZERO, |acc, (price, &sold)| {
                acc.checked_add(price.checked_mul(Decimal::from(sold))?)
            })
    }

    /// Record a batch. Either every figure is updated or none is.
    ///
    /// Rejects counts that would push the ticket total past `i64::MAX`
    /// (remaining tickets are signed) or overflow the revenue total.
    pub fn record(&mut self, tiers: &[Decimal], sales: &[u64]) -> Result<&Batch> {
        if sales.len() != tiers.len() || sales.len() != self.cumulative_sales.len() {
            return Err(AllocationError::tier_length("sales", tiers.len(), sales.len()));
        }

        let tickets = sales
            .iter()
            .try_fold(0u64, |acc, &sold| acc.checked_add(sold))
            .filter(|&t| {
                self.total_sold()
                    .checked_add(t)
                    .is_some_and(|total| total <= i64::MAX as u64)
            })
            .ok_or_else(|| AllocationError::invalid_input("sales overflow the cumulative ticket count"))?;

        let batch_revenue = Self::batch_revenue(tiers, sales)
            .ok_or_else(|| AllocationError::invalid_input("batch revenue overflows"))?;
        let cumulative_revenue = self
            .cumulative_revenue
            .checked_add(batch_revenue)
            .ok_or_else(|| AllocationError::invalid_input("sales overflow the cumulative revenue"))?;

        // Per-tier totals are bounded by the checked grand total.
        self.cumulative_revenue = cumulative_revenue;
        for (total, &sold) in self.cumulative_sales.iter_mut().zip(sales) {
            *total += sold;
        }

        self.batches.push(Batch {
            number: self.batches.len() + 1,
            sales: sales.to_vec(),
            batch_revenue,
            recorded_at: Utc::now(),
        });

        info!(
            batch = self.batches.len(),
            revenue = format!("${:.2}", batch_revenue),
            cumulative = format!("${:.2}", self.cumulative_revenue),
            tickets,
            "Batch recorded"
        );

        Ok(&self.batches[self.batches.len() - 1])
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn cumulative_sales(&self) -> &[u64] {
        &self.cumulative_sales
    }

    pub fn cumulative_revenue(&self) -> Decimal {
        self.cumulative_revenue
    }

    /// Tickets sold across all tiers and batches.
    pub fn total_sold(&self) -> u64 {
        self.cumulative_sales.iter().sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
