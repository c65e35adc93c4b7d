//! Page Replacement Policies.
//!
//! Implements the algorithms that pick a victim frame when a page fault occurs and no
//! frame is free. Policies only choose; the simulator performs the eviction and the
//! installation, so the bookkeeping is shared by every policy.
//!
//! # Policies
//!
//! - `Fifo`: First-In, First-Out (oldest installation).
//! - `Lru`: Least Recently Used (oldest access).
//! - `Optimal`: Belady's algorithm (farthest next use), needs the trace suffix.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Optimal (lookahead) replacement policy.
pub mod optimal;

use std::fmt;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use optimal::OptimalPolicy;

use crate::common::addr::{FrameNumber, PageNumber};
use crate::config::ReplacementPolicy as PolicyType;
use crate::mem::FrameTable;

/// Trait for page replacement policies.
///
/// Defines the interface for selecting the frame to reclaim on a page fault.
pub trait ReplacementPolicy: Send + Sync + fmt::Debug {
    /// Selects a victim among the occupied frames.
    ///
    /// # Arguments
    ///
    /// * `frames` - The frame table; every frame is occupied when this is called.
    /// * `upcoming` - Pages referenced after the faulting access, in trace order. Empty
    ///   when the simulator runs without lookahead.
    ///
    /// # Returns
    ///
    /// The frame to evict, or `None` if no frame is occupied.
    fn get_victim(&mut self, frames: &FrameTable, upcoming: &[PageNumber]) -> Option<FrameNumber>;

    /// Returns the configuration selector this policy implements.
    fn kind(&self) -> PolicyType;

    /// Returns `true` if [`get_victim`](Self::get_victim) needs the trace suffix.
    fn needs_lookahead(&self) -> bool {
        self.kind().needs_lookahead()
    }
}

/// Builds the policy selected by the configuration.
pub fn build(policy: PolicyType) -> Box<dyn ReplacementPolicy> {
    match policy {
        PolicyType::Fifo => Box::new(FifoPolicy::new()),
        PolicyType::Lru => Box::new(LruPolicy::new()),
        PolicyType::Optimal => Box::new(OptimalPolicy::new()),
    }
}
