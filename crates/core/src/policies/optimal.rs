//! Optimal (Belady) Replacement Policy.
//!
//! This policy evicts the resident page whose next reference lies farthest in the
//! future, keeping the pages that are needed soonest. A page that is never referenced
//! again is evicted outright. It needs the remainder of the trace, so the simulator only
//! runs it in batch mode.
//!
//! # Performance
//!
//! - **Time Complexity:** `get_victim()` is O(N × F) in the worst case, where N is the
//!   length of the remaining trace; the scan stops once every resident page is found
//! - **Space Complexity:** O(F) scratch space per call

use super::ReplacementPolicy;
use crate::common::addr::{FrameNumber, PageNumber};
use crate::config::ReplacementPolicy as PolicyType;
use crate::mem::FrameTable;

/// Optimal policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptimalPolicy;

impl OptimalPolicy {
    /// Creates a new optimal policy instance.
    pub const fn new() -> Self {
        Self
    }

    /// Finds the distance to the next reference of each resident page.
    ///
    /// `None` means the page is never referenced again.
    fn next_uses(
        frames: &FrameTable,
        upcoming: &[PageNumber],
    ) -> Vec<(FrameNumber, Option<usize>)> {
        let mut next: Vec<(FrameNumber, PageNumber, Option<usize>)> = frames
            .occupied()
            .filter_map(|f| f.resident_page.map(|p| (f.number, p, None)))
            .collect();

        let mut unresolved = next.len();
        for (distance, page) in upcoming.iter().enumerate() {
            if unresolved == 0 {
                break;
            }
            for (_, resident, slot) in &mut next {
                if slot.is_none() && *resident == *page {
                    *slot = Some(distance);
                    unresolved -= 1;
                }
            }
        }

        next.into_iter().map(|(frame, _, use_at)| (frame, use_at)).collect()
    }
}

impl ReplacementPolicy for OptimalPolicy {
    /// Returns the first frame (by index) whose page is never used again, otherwise
    /// the frame whose page is used farthest in the future.
    ///
    /// Only a strictly farther next use displaces the current choice, so ties go to
    /// the lowest frame index.
    fn get_victim(&mut self, frames: &FrameTable, upcoming: &[PageNumber]) -> Option<FrameNumber> {
        let mut victim: Option<(FrameNumber, usize)> = None;
        for (frame, next_use) in Self::next_uses(frames, upcoming) {
            match next_use {
                None => return Some(frame),
                Some(distance) => {
                    if victim.is_none_or(|(_, farthest)| distance > farthest) {
                        victim = Some((frame, distance));
                    }
                }
            }
        }
        victim.map(|(frame, _)| frame)
    }

    fn kind(&self) -> PolicyType {
        PolicyType::Optimal
    }
}
