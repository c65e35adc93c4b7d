//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the page that has not been accessed for the longest time. Recency
//! is the frame's `last_access_time`, refreshed by the simulator on every hit and set on
//! installation.
//!
//! # Performance
//!
//! - **Time Complexity:** `get_victim()` is O(F) where F is the number of frames
//! - **Space Complexity:** O(1); the timestamps live in the frame table
//! - **Best Case:** Workloads with good temporal locality
//! - **Worst Case:** Cyclic scans larger than physical memory (thrashing)

use super::ReplacementPolicy;
use crate::common::addr::{FrameNumber, PageNumber};
use crate::config::ReplacementPolicy as PolicyType;
use crate::mem::FrameTable;

/// LRU policy. Stateless: the access times are kept in the frame table.
#[derive(Debug, Default, Clone, Copy)]
pub struct LruPolicy;

impl LruPolicy {
    /// Creates a new LRU policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Returns the occupied frame with the smallest `last_access_time`.
    ///
    /// Ties go to the lowest frame index.
    fn get_victim(&mut self, frames: &FrameTable, _upcoming: &[PageNumber]) -> Option<FrameNumber> {
        frames
            .occupied()
            .min_by_key(|f| f.last_access_time)
            .map(|f| f.number)
    }

    fn kind(&self) -> PolicyType {
        PolicyType::Lru
    }
}
