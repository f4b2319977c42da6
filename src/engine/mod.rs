//! Core engine: event parameters, batch accumulation and re-allocation.
//!
//! [`AllocationEngine`] owns everything: the immutable event config and
//! derived scenario, the batch ledger, and the per-tier plan for the next
//! batch. The reporting layer reads it through accessors and drives it via
//! [`AllocationEngine::add_batch`] and
//! [`AllocationEngine::dynamic_allocation_suggestion`].
//!
//! The engine does no internal locking. Hosts submitting batches from
//! several threads must serialise calls per instance.

pub mod ledger;
pub mod suggestion;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::strategy::AdjustmentRule;
use crate::types::{AllocationError, Batch, EventConfig, Result, RoundingMode, Scenario};
use ledger::Ledger;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Tunables that are not part of the event itself.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// `None` uses [`AdjustmentRule::for_tier_count`].
    pub adjustment: Option<AdjustmentRule>,
    pub rounding: RoundingMode,
    /// Reject batches past `num_batches` instead of logging a warning.
    pub strict_batch_limit: bool,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AllocationEngine {
    config: EventConfig,
    scenario: Scenario,
    rule: AdjustmentRule,
    rounding: RoundingMode,
    strict_batch_limit: bool,
    /// Absolute tickets per tier planned for the next batch.
    planned: Vec<u64>,
    last_batch_sales: Vec<u64>,
    ledger: Ledger,
}

impl AllocationEngine {
    pub fn new(config: EventConfig) -> Result<Self> {
        Self::with_options(config, EngineOptions::default())
    }

    /// Build an engine with an explicit adjustment rule and rounding mode.
    ///
    /// Only shape is checked here (tier and percentage counts, rule
    /// indices). Percentages that do not sum to 100, unsorted tiers and
    /// similar are accepted as given; see [`EventConfig::validate`].
    pub fn with_options(config: EventConfig, options: EngineOptions) -> Result<Self> {
        let n = config.tier_count();
        if n == 0 {
            return Err(AllocationError::invalid_input("at least one tier is required"));
        }
        if config.allocation_percentages.len() != n {
            return Err(AllocationError::tier_length(
                "allocation_percentages",
                n,
                config.allocation_percentages.len(),
            ));
        }

        let rule = options
            .adjustment
            .unwrap_or_else(|| AdjustmentRule::for_tier_count(n));
        rule.validate(n)?;

        let scenario = Scenario::derive(&config);

        // Truncating, not rounding: 33.3% of 100 plans 33 tickets.
        let planned = config
            .allocation_percentages
            .iter()
            .map(|pct| (pct / 100.0 * config.first_batch_total as f64).max(0.0) as u64)
            .collect();

        info!(
            tiers = n,
            revenue_target = format!("${:.2}", scenario.revenue_target),
            global_ticket_cap = scenario.global_ticket_cap,
            batches = config.num_batches,
            rounding = %options.rounding,
            "Allocation engine initialised"
        );
        debug!(?planned, ?rule, "Initial plan");

        Ok(Self {
            scenario,
            rule,
            rounding: options.rounding,
            strict_batch_limit: options.strict_batch_limit,
            planned,
            last_batch_sales: vec![0; n],
            ledger: Ledger::new(n),
            config,
        })
    }

    // -- Mutation -----------------------------------------------------------

    /// Record one batch of observed sales, one count per tier.
    ///
    /// Fails with `InvalidInput` on a length mismatch, leaving the engine
    /// untouched. The sales become the reference for the next suggestion.
    pub fn add_batch(&mut self, sales: &[u64]) -> Result<&Batch> {
        let limit = self.config.num_batches;
        if self.ledger.len() >= limit as usize {
            if self.strict_batch_limit {
                return Err(AllocationError::BatchLimitExceeded { limit });
            }
            warn!(
                recorded = self.ledger.len(),
                limit,
                "Recording batch beyond the planned number of batches"
            );
        }

        self.ledger.record(&self.config.tiers, sales)?;
        self.last_batch_sales = sales.to_vec();

        let remaining_tickets = self.remaining_tickets_global();
        if remaining_tickets < 0 {
            warn!(
                oversold = -remaining_tickets,
                cap = self.scenario.global_ticket_cap,
                "Global ticket cap exceeded"
            );
        }
        if self.remaining_revenue() <= Decimal::ZERO {
            info!(
                cumulative = format!("${:.2}", self.ledger.cumulative_revenue()),
                target = format!("${:.2}", self.scenario.revenue_target),
                "Revenue target reached"
            );
        }

        self.ledger
            .batches()
            .last()
            .ok_or_else(|| AllocationError::invalid_input("batch was not recorded"))
    }

    // -- Read accessors -----------------------------------------------------

    /// Revenue still needed to hit the target. Negative once exceeded.
    pub fn remaining_revenue(&self) -> Decimal {
        self.scenario.revenue_target - self.ledger.cumulative_revenue()
    }

    /// Tickets left under the global cap. Negative once oversold.
    pub fn remaining_tickets_global(&self) -> i64 {
        self.scenario.global_ticket_cap as i64 - self.ledger.total_sold() as i64
    }

    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn tiers(&self) -> &[Decimal] {
        &self.config.tiers
    }

    pub fn adjustment_rule(&self) -> &AdjustmentRule {
        &self.rule
    }

    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    pub fn revenue_target(&self) -> Decimal {
        self.scenario.revenue_target
    }

    pub fn global_ticket_cap(&self) -> u64 {
        self.scenario.global_ticket_cap
    }

    /// Tickets per tier planned for the next batch.
    pub fn current_batch_planned_allocations(&self) -> &[u64] {
        &self.planned
    }

    /// Sales from the most recent batch (zeros before the first one).
    pub fn last_batch_sales(&self) -> &[u64] {
        &self.last_batch_sales
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn batches(&self) -> &[Batch] {
        self.ledger.batches()
    }

    pub fn cumulative_sales(&self) -> &[u64] {
        self.ledger.cumulative_sales()
    }

    pub fn cumulative_revenue(&self) -> Decimal {
        self.ledger.cumulative_revenue()
    }

    pub fn total_sold(&self) -> u64 {
        self.ledger.total_sold()
    }

    pub fn batch_count(&self) -> usize {
        self.ledger.len()
    }

    /// Planned batches not yet recorded. Zero once the plan is used up.
    pub fn batches_remaining(&self) -> usize {
        (self.config.num_batches as usize).saturating_sub(self.ledger.len())
    }

    pub fn is_complete(&self) -> bool {
        self.batches_remaining() == 0
    }

    /// Fraction of the revenue target collected so far (0 when the target is 0).
    pub fn revenue_progress(&self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;

        if self.scenario.revenue_target.is_zero() {
            return 0.0;
        }
        (self.ledger.cumulative_revenue() / self.scenario.revenue_target)
            .to_f64()
            .unwrap_or(0.0)
    }

    /// Tickets at the flat per-participant cost needed to close the gap.
    pub fn baseline_tickets_needed(&self) -> Decimal {
        if self.config.cost_per_participant.is_zero() {
            Decimal::ZERO
        } else {
            self.remaining_revenue() / self.config.cost_per_participant
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
