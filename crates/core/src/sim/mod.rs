//! Simulation driver.
//!
//! This module ties the tables and the replacement policy together:
//! 1. **Simulator:** The per-access hit/miss/evict/install pipeline and its entry points.
//! 2. **Trace:** Loading trace files into a header, directives, and access records.
//! 3. **Report:** Text and JSON renderings of the simulator state.

/// State reports.
pub mod report;

/// Top-level simulator.
pub mod simulator;

/// Trace file loader.
pub mod trace;

pub use report::{ConfigBanner, Snapshot, StateReport};
pub use simulator::{Eviction, Outcome, Simulator};
pub use trace::{Batch, Directive, Trace, TraceEntry, TraceLine};
