//! Demand-paged virtual memory simulator library.
//!
//! This crate models a single address space backed by a fixed pool of physical frames:
//! 1. **Common:** Address and page/frame number types, access records, and error types.
//! 2. **Memory:** Page table, frame table, and the swap-space backing store.
//! 3. **Policies:** Victim selection for FIFO, LRU, and optimal (lookahead) replacement.
//! 4. **Simulation:** The shared hit/miss/evict/install pipeline, trace loading, and reports.
//! 5. **Statistics:** Reference, miss, eviction, and swap counters.

/// Common types (addresses, page/frame numbers, access records, errors).
pub mod common;
/// Simulator configuration (defaults, policy selection, validation).
pub mod config;
/// Page table, frame table, and backing store.
pub mod mem;
/// Page replacement policy implementations.
pub mod policies;
/// Simulator, trace loader, and state reports.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; parse it from a trace header or JSON.
pub use crate::config::{Config, ReplacementPolicy};
/// Main simulator type; owns the page table, frame table, backing store, and stats.
pub use crate::sim::Simulator;
