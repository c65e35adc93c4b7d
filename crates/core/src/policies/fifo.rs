//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the page that has been resident the longest, regardless of how
//! recently it was accessed. Age is the frame's `load_time`, the reference clock value
//! at installation; hits never change it.
//!
//! # Performance
//!
//! - **Time Complexity:** `get_victim()` is O(F) where F is the number of frames
//! - **Space Complexity:** O(1); the ages live in the frame table
//! - **Best Case:** Streaming accesses where all pages have equal importance
//! - **Worst Case:** Workloads with strong temporal locality (may evict hot pages)

use super::ReplacementPolicy;
use crate::common::addr::{FrameNumber, PageNumber};
use crate::config::ReplacementPolicy as PolicyType;
use crate::mem::FrameTable;

/// FIFO policy. Stateless: the installation times are kept in the frame table.
#[derive(Debug, Default, Clone, Copy)]
pub struct FifoPolicy;

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for FifoPolicy {
    /// Returns the occupied frame with the smallest `load_time`.
    ///
    /// Ties go to the lowest frame index.
    fn get_victim(&mut self, frames: &FrameTable, _upcoming: &[PageNumber]) -> Option<FrameNumber> {
        frames
            .occupied()
            .min_by_key(|f| f.load_time)
            .map(|f| f.number)
    }

    fn kind(&self) -> PolicyType {
        PolicyType::Fifo
    }
}
