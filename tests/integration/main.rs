//! Integration tests for the allocation engine.
//!
//! Drive the public API end to end: configuration, batch cycles and the
//! reference fixtures.

mod batch_cycle;
mod config_file;
mod fixtures;
