//! Read-only report views over an [`AllocationEngine`].
//!
//! `ScenarioAnalysis` and `SalesReport` render the planner-facing text
//! blocks; `EngineSnapshot` is the same state as serializable data.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::engine::AllocationEngine;
use crate::types::{Batch, EventConfig, Scenario};

// ---------------------------------------------------------------------------
// Scenario analysis
// ---------------------------------------------------------------------------

/// Event parameters, derived scenario and the initial plan.
pub struct ScenarioAnalysis<'a> {
    engine: &'a AllocationEngine,
}

impl<'a> ScenarioAnalysis<'a> {
    pub fn new(engine: &'a AllocationEngine) -> Self {
        Self { engine }
    }
}

impl fmt::Display for ScenarioAnalysis<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cfg = self.engine.config();
        let s = self.engine.scenario();

        writeln!(f, "--- Event Cost & Revenue Scenario Analysis ---")?;
        writeln!(f, "Desired Total Dollar Value: ${:.2}", cfg.desired_total_value)?;
        writeln!(f, "Total Participants: {}", cfg.total_participants)?;
        writeln!(f, "Cost per Participant: ${}", cfg.cost_per_participant)?;
        writeln!(f)?;
        writeln!(f, "Non-Paying Participants Range:")?;
        writeln!(f, "  Lower Bound: {}", cfg.non_paying_lower)?;
        writeln!(f, "  Upper Bound: {}", cfg.non_paying_upper)?;
        writeln!(f, "  (Computed Midpoint: {})", s.non_paying_mid)?;
        writeln!(f)?;
        writeln!(f, "Calculated Paying Participants:")?;
        writeln!(f, "  Best-case (few non-payers): {}", s.paying_best)?;
        writeln!(f, "  Midpoint: {}", s.paying_mid)?;
        writeln!(f, "  Worst-case (many non-payers): {}", s.paying_worst)?;
        writeln!(f)?;
        writeln!(f, "Revenue Target (using midpoint paying participants): ${:.2}", s.revenue_target)?;
        writeln!(f, "Global Ticket Cap (Total tickets to be sold across batches): {}", s.global_ticket_cap)?;
        writeln!(f, "Number of Batches: {}", cfg.num_batches)?;
        writeln!(f, "First Batch Total Tickets: {}", cfg.first_batch_total)?;
        writeln!(f)?;
        writeln!(f, "Initial Batch Allocations (absolute numbers) per tier:")?;
        for (i, alloc) in self.engine.current_batch_planned_allocations().iter().enumerate() {
            writeln!(
                f,
                "  Tier {} (${}): {} tickets (from {}% input)",
                i + 1,
                cfg.tiers[i],
                alloc,
                cfg.allocation_percentages[i]
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sales report
// ---------------------------------------------------------------------------

/// Progress against the target after the batches recorded so far.
pub struct SalesReport<'a> {
    engine: &'a AllocationEngine,
}

impl<'a> SalesReport<'a> {
    pub fn new(engine: &'a AllocationEngine) -> Self {
        Self { engine }
    }
}

impl fmt::Display for SalesReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.engine;

        writeln!(f, "--- Sales Report ---")?;
        writeln!(f, "Revenue Target: ${:.2}", e.revenue_target())?;
        writeln!(f, "Cumulative Revenue: ${:.2}", e.cumulative_revenue())?;
        writeln!(f, "Remaining Revenue: ${:.2}", e.remaining_revenue())?;
        writeln!(f, "Progress: {:.1}%", e.revenue_progress() * 100.0)?;
        writeln!(
            f,
            "Baseline Tickets Needed (at ${}): {}",
            e.config().cost_per_participant,
            e.baseline_tickets_needed().round()
        )?;
        writeln!(f)?;
        writeln!(f, "Cumulative Sales by Tier:")?;
        for (i, sold) in e.cumulative_sales().iter().enumerate() {
            writeln!(f, "  Tier {} (${}): {} tickets sold", i + 1, e.tiers()[i], sold)?;
        }
        writeln!(f)?;
        writeln!(f, "Batch Details:")?;
        for batch in e.batches() {
            writeln!(f, "  {batch}")?;
        }
        writeln!(f)?;
        write!(f, "Global Remaining Tickets: {}", e.remaining_tickets_global())
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Complete public engine state as plain data.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub event: EventConfig,
    pub scenario: Scenario,
    pub current_batch_planned_allocations: Vec<u64>,
    pub last_batch_sales: Vec<u64>,
    pub batches: Vec<Batch>,
    pub cumulative_sales: Vec<u64>,
    pub cumulative_revenue: Decimal,
    pub remaining_revenue: Decimal,
    pub remaining_tickets_global: i64,
}

impl EngineSnapshot {
    pub fn capture(engine: &AllocationEngine) -> Self {
        Self {
            event: engine.config().clone(),
            scenario: engine.scenario().clone(),
            current_batch_planned_allocations: engine.current_batch_planned_allocations().to_vec(),
            last_batch_sales: engine.last_batch_sales().to_vec(),
            batches: engine.batches().to_vec(),
            cumulative_sales: engine.cumulative_sales().to_vec(),
            cumulative_revenue: engine.cumulative_revenue(),
            remaining_revenue: engine.remaining_revenue(),
            remaining_tickets_global: engine.remaining_tickets_global(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
