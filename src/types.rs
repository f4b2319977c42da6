//! Shared types for the ticket allocation engine.
//!
//! Event parameters, derived scenario figures, batch records, the
//! suggestion result handed to the reporting layer, and the error type.
//! Engine, strategy and report modules all depend on these without
//! depending on each other.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Event configuration
// ---------------------------------------------------------------------------

/// Event parameters supplied once by the planner. Immutable after the
/// engine is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Informational only; the revenue target is derived from participants.
    pub desired_total_value: Decimal,
    pub total_participants: u64,
    pub cost_per_participant: Decimal,
    pub non_paying_lower: u64,
    pub non_paying_upper: u64,
    /// Price per tier, cheapest first by convention.
    pub tiers: Vec<Decimal>,
    /// Planned share of each batch per tier, in percent (should sum to 100).
    pub allocation_percentages: Vec<f64>,
    pub first_batch_total: u64,
    pub num_batches: u32,
}

impl EventConfig {
    /// Number of pricing tiers.
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Advisory checks the engine itself never enforces.
    ///
    /// Returns one message per finding; an empty vector means the
    /// configuration looks sane. Callers decide whether to warn or abort.
    pub fn validate(&self) -> Vec<String> {
        let mut findings = Vec::new();

        if self.tiers.len() != self.allocation_percentages.len() {
            findings.push(format!(
                "{} tier prices but {} allocation percentages",
                self.tiers.len(),
                self.allocation_percentages.len()
            ));
        }

        let pct_sum: f64 = self.allocation_percentages.iter().sum();
        if (pct_sum - 100.0).abs() > 0.01 {
            findings.push(format!("Allocation percentages sum to {pct_sum:.2}, not 100"));
        }

        if self.allocation_percentages.iter().any(|p| *p < 0.0) {
            findings.push("Allocation percentages contain a negative value".to_string());
        }

        if self.non_paying_lower > self.non_paying_upper {
            findings.push(format!(
                "Non-paying lower bound {} exceeds upper bound {}",
                self.non_paying_lower, self.non_paying_upper
            ));
        }

        if self.non_paying_upper > self.total_participants {
            findings.push(format!(
                "Non-paying upper bound {} exceeds total participants {}",
                self.non_paying_upper, self.total_participants
            ));
        }

        if self.num_batches == 0 {
            findings.push("Number of batches is zero".to_string());
        }

        if self.tiers.iter().any(|p| *p <= Decimal::ZERO) {
            findings.push("Tier prices must be positive".to_string());
        }

        if self.tiers.windows(2).any(|w| w[0] > w[1]) {
            findings.push("Tier prices are not in ascending order".to_string());
        }

        findings
    }

    /// The reference scenario used throughout the tests: 80k participants,
    /// four tiers at 550/750/1000/1250, four batches of 20k.
    #[cfg(test)]
    pub fn sample() -> Self {
        EventConfig {
            desired_total_value: dec!(1000000),
            total_participants: 80_000,
            cost_per_participant: dec!(750),
            non_paying_lower: 20_000,
            non_paying_upper: 30_000,
            tiers: vec![dec!(550), dec!(750), dec!(1000), dec!(1250)],
            allocation_percentages: vec![40.0, 30.0, 20.0, 10.0],
            first_batch_total: 20_000,
            num_batches: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived scenario
// ---------------------------------------------------------------------------

/// Figures derived once from the event configuration.
///
/// "Best" means fewest non-payers, i.e. the most paying participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub non_paying_mid: Decimal,
    pub paying_best: i64,
    pub paying_mid: Decimal,
    pub paying_worst: i64,
    pub revenue_target: Decimal,
    pub global_ticket_cap: u64,
}

impl Scenario {
    pub fn derive(config: &EventConfig) -> Self {
        let lower = Decimal::from(config.non_paying_lower);
        let upper = Decimal::from(config.non_paying_upper);
        let total = Decimal::from(config.total_participants);

        let non_paying_mid = (lower + upper) / dec!(2);
        let paying_mid = total - non_paying_mid;

        Self {
            non_paying_mid,
            paying_best: config.total_participants as i64 - config.non_paying_upper as i64,
            paying_mid,
            paying_worst: config.total_participants as i64 - config.non_paying_lower as i64,
            revenue_target: paying_mid * config.cost_per_participant,
            global_ticket_cap: config.first_batch_total * u64::from(config.num_batches),
        }
    }
}

// ---------------------------------------------------------------------------
// Batch ledger entries
// ---------------------------------------------------------------------------

/// One recorded round of sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// 1-based position in the ledger.
    pub number: usize,
    /// Tickets sold per tier.
    pub sales: Vec<u64>,
    /// Σ sales[i] × tiers[i]
    pub batch_revenue: Decimal,
    pub recorded_at: DateTime<Utc>,
}

impl Batch {
    pub fn tickets_sold(&self) -> u64 {
        self.sales.iter().sum()
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Batch {}: Sales: {:?}, Revenue: ${:.2}",
            self.number, self.sales, self.batch_revenue
        )
    }
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// How fractional suggested allocations become whole tickets.
///
/// Each tier is rounded independently, so the committed total may drift
/// by a ticket or two from the batch size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// 2.5 → 3, 3.5 → 4
    #[default]
    HalfAwayFromZero,
    /// 2.5 → 2, 3.5 → 4
    HalfEven,
}

impl RoundingMode {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            RoundingMode::HalfAwayFromZero => value.round(),
            RoundingMode::HalfEven => value.round_ties_even(),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMode::HalfAwayFromZero => write!(f, "half-away-from-zero"),
            RoundingMode::HalfEven => write!(f, "half-even"),
        }
    }
}

// ---------------------------------------------------------------------------
// Suggestion result
// ---------------------------------------------------------------------------

/// Everything the allocation pass computed for the next batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResult {
    pub next_batch_total: u64,
    pub tiers: Vec<Decimal>,
    /// Percentages applied to the next batch size, before any adjustment.
    pub base_planned: Vec<f64>,
    /// Unsold planned tickets carried over from the batch just observed.
    pub rollover: Vec<u64>,
    /// Tier that absorbs the net adjustment.
    pub adjusted_tier: usize,
    pub reduction_extra: u64,
    pub reduction_adjustment: i64,
    pub increase_extra: u64,
    pub increase_adjustment: i64,
    pub net_adjustment: i64,
    /// remaining revenue / next batch total
    pub required_avg: Decimal,
    /// The cheapest tier was zeroed because the required average exceeds its price.
    pub cheapest_tier_cut: bool,
    /// Final allocations before rounding.
    pub suggested: Vec<f64>,
    /// Rounded allocations written back as the next batch plan.
    pub committed: Vec<u64>,
    pub new_percentages: Vec<f64>,
}

impl SuggestionResult {
    pub fn committed_total(&self) -> u64 {
        self.committed.iter().sum()
    }
}

impl fmt::Display for SuggestionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Dynamic Allocation Suggestions ---")?;
        if self.cheapest_tier_cut {
            let cheapest = self.tiers.first().copied().unwrap_or_default();
            writeln!(
                f,
                "Required average for next batch is ${:.2}, which is above Tier 1 price ${:.2}.",
                self.required_avg, cheapest
            )?;
            writeln!(f, "Cutting off Tier 1 in the next batch to help meet revenue targets.")?;
        }
        writeln!(f, "Next batch total planned tickets: {}", self.next_batch_total)?;
        let base: Vec<String> = self.base_planned.iter().map(|x| format!("{x:.0}")).collect();
        writeln!(f, "Base planned allocations (from percentages): [{}]", base.join(", "))?;
        let rollover: Vec<String> = self.rollover.iter().map(|x| x.to_string()).collect();
        writeln!(f, "Rollover from last batch: [{}]", rollover.join(", "))?;
        writeln!(
            f,
            "Oversell in reduction tiers: {} -> Reduction: {} tickets",
            self.reduction_extra, self.reduction_adjustment
        )?;
        writeln!(
            f,
            "Oversell in increase tiers: {} -> Increase: {} tickets",
            self.increase_extra, self.increase_adjustment
        )?;
        writeln!(
            f,
            "Net adjustment for Tier {}: {} tickets",
            self.adjusted_tier + 1,
            self.net_adjustment
        )?;
        writeln!(f, "Suggested next batch allocations (absolute numbers):")?;
        for (i, alloc) in self.suggested.iter().enumerate() {
            let price = self.tiers.get(i).copied().unwrap_or_default();
            writeln!(f, "  Tier {} (${}): {:.0} tickets", i + 1, price, alloc)?;
        }
        writeln!(f, "New weight percentages for next batch:")?;
        for (i, pct) in self.new_percentages.iter().enumerate() {
            writeln!(f, "  Tier {}: {:.1}%", i + 1, pct)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, AllocationError>;

/// Domain errors raised by the allocation engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    /// Shape mismatch or malformed rule; the call had no effect.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A divisor that must be positive was not.
    #[error("Degenerate division in {context}: divisor is {value}")]
    DivisionDegenerate { context: String, value: f64 },

    #[error("Batch limit of {limit} already reached")]
    BatchLimitExceeded { limit: u32 },
}

impl AllocationError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn division_degenerate(context: impl Into<String>, value: f64) -> Self {
        Self::DivisionDegenerate {
            context: context.into(),
            value,
        }
    }

    /// Length mismatch between a per-tier vector and the tier list.
    pub fn tier_length(what: &str, expected: usize, actual: usize) -> Self {
        Self::invalid_input(format!("{what} has {actual} entries, expected {expected}"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
