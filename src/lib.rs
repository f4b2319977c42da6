//! tickcalc: tiered ticket sales pacing toward a revenue target.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod strategy;
pub mod engine;
pub mod report;

pub use engine::{AllocationEngine, EngineOptions};
pub use types::{AllocationError, Batch, EventConfig, Result, RoundingMode, Scenario, SuggestionResult};
