//! State reports.
//!
//! Renders the simulator state for the dispatch loop:
//! 1. **StateReport:** The page table, frame table, and counters as text.
//! 2. **ConfigBanner:** The run parameters printed once when a run starts.
//! 3. **Snapshot:** The same state as a serializable document for JSON output.

use std::fmt;

use serde::Serialize;

use crate::config::Config;
use crate::mem::{Frame, FrameTable, Page, PageState, PageTable};
use crate::stats::SimStats;

/// Width of the right-aligned table index column.
const INDEX_WIDTH: usize = 5;

/// Text rendering of the page table, frame table, and counters.
#[derive(Debug, Clone, Copy)]
pub struct StateReport<'a> {
    pages: &'a PageTable,
    frames: &'a FrameTable,
    stats: &'a SimStats,
}

impl<'a> StateReport<'a> {
    /// Borrows the tables and counters to render.
    pub const fn new(pages: &'a PageTable, frames: &'a FrameTable, stats: &'a SimStats) -> Self {
        Self {
            pages,
            frames,
            stats,
        }
    }

    fn write_page(f: &mut fmt::Formatter<'_>, page: &Page) -> fmt::Result {
        let index = page.number.index();
        if page.state == PageState::NeverMapped {
            return writeln!(f, "{index:>INDEX_WIDTH$} type:UNUSED");
        }
        let frame: &dyn fmt::Display = match &page.frame {
            Some(fr) => fr,
            None => &-1,
        };
        writeln!(
            f,
            "{index:>INDEX_WIDTH$} type:{} framenum:{frame} ondisk:{}",
            page.state.label(),
            u8::from(page.on_disk)
        )
    }

    fn write_frame(f: &mut fmt::Formatter<'_>, frame: &Frame) -> fmt::Result {
        let index = frame.number.index();
        if !frame.is_occupied() {
            return writeln!(f, "{index:>INDEX_WIDTH$} inuse:0");
        }
        writeln!(
            f,
            "{index:>INDEX_WIDTH$} inuse:1 dirty:{} first_use:{} last_use:{}",
            u8::from(frame.dirty),
            frame.load_time,
            frame.last_access_time
        )
    }
}

impl fmt::Display for StateReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Page Table")?;
        for page in self.pages.iter() {
            Self::write_page(f, page)?;
        }
        writeln!(f, "Frame Table")?;
        for frame in self.frames.iter() {
            Self::write_frame(f, frame)?;
        }
        write!(f, "{}", self.stats)
    }
}

/// Text rendering of the run parameters.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBanner<'a> {
    config: &'a Config,
}

impl<'a> ConfigBanner<'a> {
    /// Borrows the configuration to render.
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl fmt::Display for ConfigBanner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Page size: {}", self.config.page_size)?;
        writeln!(f, "Num frames: {}", self.config.num_frames)?;
        writeln!(f, "Num pages: {}", self.config.num_pages)?;
        writeln!(f, "Num backing blocks: {}", self.config.num_backing_slots)?;
        writeln!(f, "Reclaim algorithm: {}", self.config.policy)
    }
}

/// Serializable view of the whole simulator state.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    /// Run parameters.
    pub config: &'a Config,
    /// Counters.
    pub stats: &'a SimStats,
    /// Page table entries in page-number order.
    pub pages: Vec<&'a Page>,
    /// Frame table entries in frame-number order.
    pub frames: Vec<&'a Frame>,
}

impl<'a> Snapshot<'a> {
    /// Borrows the state to serialize.
    pub fn new(
        config: &'a Config,
        stats: &'a SimStats,
        pages: &'a PageTable,
        frames: &'a FrameTable,
    ) -> Self {
        Self {
            config,
            stats,
            pages: pages.iter().collect(),
            frames: frames.iter().collect(),
        }
    }

    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns any serializer error.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
