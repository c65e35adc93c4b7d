//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters of a paging run. It provides:
//! 1. **References:** Total accesses processed (the reference clock).
//! 2. **Faults:** Page misses and frames stolen from resident pages.
//! 3. **Swap traffic:** Dirty pages written to swap space and images recovered from it.
//! 4. **Occupancy:** The number of pages ever mapped, a point-in-time gauge.
//!
//! Every counter except `pages_mapped` is monotonic over a run.

use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

/// Simulation statistics structure tracking all paging counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Number of accesses processed; also the current reference clock value.
    pub pages_referenced: u64,
    /// Number of pages that are resident or evicted (ever touched).
    pub pages_mapped: u64,
    /// Number of accesses that found their page absent.
    pub page_miss_instances: u64,
    /// Number of misses that had to reclaim an occupied frame.
    pub frame_stolen_instances: u64,
    /// Number of stolen frames whose dirty page was written to swap space.
    pub stolen_frames_written_to_swapspace: u64,
    /// Number of faulted-in pages whose image was recovered from swap space.
    pub stolen_frames_recovered_from_swapspace: u64,
}

/// Section names for selective summary output.
///
/// Pass an empty slice to [`SimStats::write_sections`] to write all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "faults", "swap"];

impl SimStats {
    /// Number of accesses that found their page resident.
    pub const fn hits(&self) -> u64 {
        self.pages_referenced.saturating_sub(self.page_miss_instances)
    }

    /// Fraction of accesses that hit, or 0.0 for an empty run.
    pub fn hit_ratio(&self) -> f64 {
        if self.pages_referenced == 0 {
            0.0
        } else {
            self.hits() as f64 / self.pages_referenced as f64
        }
    }

    /// Fraction of accesses that missed, or 0.0 for an empty run.
    pub fn miss_ratio(&self) -> f64 {
        if self.pages_referenced == 0 {
            0.0
        } else {
            self.page_miss_instances as f64 / self.pages_referenced as f64
        }
    }

    /// Writes the requested summary sections.
    ///
    /// Each element of `sections` should be one of `"summary"`, `"faults"`, or `"swap"`.
    /// Pass an empty slice to write all sections.
    ///
    /// # Errors
    ///
    /// Propagates any error from the writer.
    pub fn write_sections<W: Write>(&self, out: &mut W, sections: &[String]) -> io::Result<()> {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        writeln!(out, "==========================================================")?;
        writeln!(out, "VIRTUAL MEMORY SIMULATION STATISTICS")?;
        writeln!(out, "==========================================================")?;
        if want("summary") {
            writeln!(out, "refs.total             {}", self.pages_referenced)?;
            writeln!(out, "refs.hits              {}", self.hits())?;
            writeln!(out, "pages.mapped           {}", self.pages_mapped)?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("faults") {
            writeln!(
                out,
                "faults.misses          {} ({:.2}%)",
                self.page_miss_instances,
                self.miss_ratio() * 100.0
            )?;
            writeln!(out, "faults.stolen          {}", self.frame_stolen_instances)?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("swap") {
            writeln!(
                out,
                "swap.writes            {}",
                self.stolen_frames_written_to_swapspace
            )?;
            writeln!(
                out,
                "swap.recoveries        {}",
                self.stolen_frames_recovered_from_swapspace
            )?;
        }
        writeln!(out, "==========================================================")
    }

    /// Writes all summary sections.
    ///
    /// # Errors
    ///
    /// Propagates any error from the writer.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.write_sections(out, &[])
    }
}

impl fmt::Display for SimStats {
    /// Formats the counters in the layout that closes every state report.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pages referenced: {}", self.pages_referenced)?;
        writeln!(f, "Pages mapped: {}", self.pages_mapped)?;
        writeln!(f, "Page miss instances: {}", self.page_miss_instances)?;
        writeln!(f, "Frame stolen instances: {}", self.frame_stolen_instances)?;
        writeln!(
            f,
            "Stolen frames written to swapspace: {}",
            self.stolen_frames_written_to_swapspace
        )?;
        writeln!(
            f,
            "Stolen frames recovered from swapspace: {}",
            self.stolen_frames_recovered_from_swapspace
        )
    }
}
