//! Full add-batch → suggest cycles through the public API.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tickcalc::report::{EngineSnapshot, SalesReport};
use tickcalc::AllocationError;

use crate::fixtures::{modest_target_engine, reference_engine};

const BATCH_1: [u64; 4] = [7500, 6000, 4500, 2000];
const BATCH_2: [u64; 4] = [8000, 5500, 4000, 2500];

#[test]
fn test_reference_derived_values() {
    let engine = reference_engine();
    let s = engine.scenario();
    assert_eq!(s.non_paying_mid, dec!(25000));
    assert_eq!(s.paying_mid, dec!(55000));
    assert_eq!(s.revenue_target, dec!(41250000));
    assert_eq!(s.global_ticket_cap, 80_000);
    assert_eq!(engine.current_batch_planned_allocations(), &[8000, 6000, 4000, 2000]);
}

#[test]
fn test_single_batch_revenue_and_remaining() {
    let mut engine = reference_engine();
    engine.add_batch(&BATCH_1).unwrap();

    let expected: Decimal = BATCH_1
        .iter()
        .zip(engine.tiers())
        .map(|(&sold, price)| Decimal::from(sold) * *price)
        .sum();
    assert_eq!(engine.cumulative_revenue(), expected);
    assert_eq!(engine.cumulative_revenue(), dec!(15625000));
    assert_eq!(engine.remaining_tickets_global(), 60_000);
    assert_eq!(engine.remaining_revenue(), dec!(25625000));
}

#[test]
fn test_two_batches_accumulate() {
    let mut engine = reference_engine();
    engine.add_batch(&BATCH_1).unwrap();
    engine.add_batch(&BATCH_2).unwrap();

    assert_eq!(engine.cumulative_sales(), &[15500, 11500, 8500, 4500]);
    assert_eq!(engine.batches().len(), 2);

    let ledger_revenue: Decimal = engine.batches().iter().map(|b| b.batch_revenue).sum();
    assert_eq!(engine.cumulative_revenue(), ledger_revenue);
    assert_eq!(
        engine.remaining_tickets_global(),
        engine.global_ticket_cap() as i64 - 40_000
    );
}

#[test]
fn test_accumulation_is_order_independent() {
    let mut forward = reference_engine();
    forward.add_batch(&BATCH_1).unwrap();
    forward.add_batch(&BATCH_2).unwrap();

    let mut reverse = reference_engine();
    reverse.add_batch(&BATCH_2).unwrap();
    reverse.add_batch(&BATCH_1).unwrap();

    assert_eq!(forward.cumulative_sales(), reverse.cumulative_sales());
    assert_eq!(forward.cumulative_revenue(), reverse.cumulative_revenue());
}

#[test]
fn test_full_cycle_plans_stay_within_batch() {
    let mut engine = modest_target_engine();
    let observed = [
        [7000, 6500, 4200, 2100],
        [6000, 7000, 5000, 1500],
        [9000, 4000, 3000, 2500],
    ];

    for sales in observed {
        engine.add_batch(&sales).unwrap();
        let r = engine.dynamic_allocation_suggestion().unwrap();

        assert!(r.committed_total() <= r.next_batch_total + r.committed.len() as u64);
        assert_eq!(engine.current_batch_planned_allocations(), r.committed.as_slice());
        assert_eq!(r.base_planned.len(), 4);
        assert_eq!(r.new_percentages.len(), 4);
    }

    assert_eq!(engine.batches_remaining(), 1);
}

#[test]
fn test_price_floor_cuts_cheapest_tier() {
    let mut engine = reference_engine();
    engine.add_batch(&BATCH_1).unwrap();
    let r = engine.dynamic_allocation_suggestion().unwrap();

    assert!(r.required_avg > engine.tiers()[0]);
    assert!(r.cheapest_tier_cut);
    assert_eq!(r.suggested[0], 0.0);
    assert_eq!(engine.current_batch_planned_allocations()[0], 0);

    let text = r.to_string();
    assert!(text.contains("Cutting off Tier 1"));
    assert!(text.contains("Next batch total planned tickets: 20000"));
}

#[test]
fn test_invalid_sales_leave_state_untouched() {
    let mut engine = reference_engine();
    engine.add_batch(&BATCH_1).unwrap();
    let before = EngineSnapshot::capture(&engine);

    let err = engine.add_batch(&[1, 2]).unwrap_err();
    assert!(matches!(err, AllocationError::InvalidInput { .. }));

    let after = EngineSnapshot::capture(&engine);
    assert_eq!(before.batches, after.batches);
    assert_eq!(before.cumulative_sales, after.cumulative_sales);
    assert_eq!(before.last_batch_sales, after.last_batch_sales);
    assert_eq!(before.cumulative_revenue, after.cumulative_revenue);
}

#[test]
fn test_exhausted_cap_reports_degenerate() {
    let mut engine = reference_engine();
    for _ in 0..4 {
        engine.add_batch(&[8000, 6000, 4000, 2000]).unwrap();
    }
    assert!(engine.is_complete());
    assert!(matches!(
        engine.dynamic_allocation_suggestion(),
        Err(AllocationError::DivisionDegenerate { .. })
    ));
}

#[test]
fn test_report_after_cycle() {
    let mut engine = reference_engine();
    engine.add_batch(&BATCH_1).unwrap();
    engine.add_batch(&BATCH_2).unwrap();

    let text = SalesReport::new(&engine).to_string();
    assert!(text.contains("Batch 2: Sales: [8000, 5500, 4000, 2500]"));
    assert!(text.contains("Tier 1 ($550): 15500 tickets sold"));
    assert!(text.ends_with("Global Remaining Tickets: 40000"));
}
