//! Shared event fixtures.

use rust_decimal_macros::dec;
use tickcalc::{AllocationEngine, EventConfig};

/// 80k participants, tiers 550/750/1000/1250 at 40/30/20/10, four batches of 20k.
pub fn reference_event() -> EventConfig {
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

pub fn reference_engine() -> AllocationEngine {
    AllocationEngine::new(reference_event()).unwrap()
}

/// Same event with a 5.5M target, low enough that tier 1 stays in play.
pub fn modest_target_engine() -> AllocationEngine {
    let mut event = reference_event();
    event.cost_per_participant = dec!(100);
    AllocationEngine::new(event).unwrap()
}
