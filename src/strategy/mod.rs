//! Allocation strategy: cross-tier adjustment and feasibility capping.
//!
//! Pure functions over per-tier vectors; the engine owns the state and
//! calls into these during a suggestion pass.

pub mod adjustment;
pub mod feasibility;

pub use adjustment::{AdjustmentRule, TierAdjustment};
