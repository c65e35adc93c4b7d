//! Simulator: owns the page table, frame table, backing store, and replacement policy.
//!
//! Every access goes through one pipeline regardless of policy:
//! 1. Advance the reference clock.
//! 2. On a hit, refresh the frame's access time and dirty bit; nothing else changes.
//! 3. On a miss, install into the lowest free frame, or ask the policy for a victim,
//!    evict it (writing it to swap space if dirty), then install into the freed frame.
//!
//! FIFO and LRU can be driven one access at a time through [`Simulator::access`].
//! The optimal policy needs the rest of the trace for every decision, so it is driven
//! through [`Simulator::run_batch`] instead.

use tracing::debug;

use super::report::{ConfigBanner, Snapshot, StateReport};
use crate::common::access::{AccessRecord, Operation};
use crate::common::addr::{FrameNumber, PageNumber, page_of};
use crate::common::error::{ConfigError, SimError, TraceError};
use crate::config::{Config, ReplacementPolicy as PolicyType};
use crate::mem::{BackingStore, FrameTable, PageTable};
use crate::policies::{self, ReplacementPolicy};
use crate::stats::SimStats;

/// What happened to the page that lost its frame on a miss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Eviction {
    /// Page that was evicted.
    pub victim: PageNumber,
    /// `true` if the victim was dirty and its image went to swap space.
    pub written_to_swap: bool,
    /// `true` if the incoming page's image was recovered from swap space.
    pub recovered_from_swap: bool,
}

/// Result of a single access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The page was resident in `frame`.
    Hit {
        /// Frame holding the page.
        frame: FrameNumber,
    },
    /// The page was faulted into `frame`.
    Miss {
        /// Frame the page was installed into.
        frame: FrameNumber,
        /// Present when the frame had to be stolen from another page.
        eviction: Option<Eviction>,
    },
}

impl Outcome {
    /// Returns `true` for hits.
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// Returns the frame that holds the accessed page after the access.
    pub const fn frame(&self) -> FrameNumber {
        match self {
            Self::Hit { frame } | Self::Miss { frame, .. } => *frame,
        }
    }

    /// Returns the eviction performed by a miss, if any.
    pub const fn eviction(&self) -> Option<Eviction> {
        match self {
            Self::Hit { .. } => None,
            Self::Miss { eviction, .. } => *eviction,
        }
    }
}

/// Top-level simulator: tables, policy, and counters for one run.
#[derive(Debug)]
pub struct Simulator {
    config: Config,
    pages: PageTable,
    frames: FrameTable,
    backing_store: BackingStore,
    policy: Box<dyn ReplacementPolicy>,
    stats: SimStats,
    verbose: bool,
}

impl Simulator {
    /// Creates a simulator with empty tables sized by `config`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Self::with_policy(config, policies::build(config.policy))
    }

    /// Creates a simulator that asks `policy` for victims instead of the policy named
    /// by `config`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Config::validate`].
    pub fn with_policy(
        config: &Config,
        policy: Box<dyn ReplacementPolicy>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            pages: PageTable::new(config.num_pages),
            frames: FrameTable::new(config.num_frames),
            backing_store: BackingStore::new(config.num_backing_slots),
            policy,
            stats: SimStats::default(),
            verbose: false,
        })
    }

    /// The configuration this simulator was built from.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The active replacement policy.
    pub fn policy(&self) -> PolicyType {
        self.policy.kind()
    }

    /// Read-only view of the page table.
    pub const fn page_table(&self) -> &PageTable {
        &self.pages
    }

    /// Read-only view of the frame table.
    pub const fn frame_table(&self) -> &FrameTable {
        &self.frames
    }

    /// Read-only view of the backing store.
    pub const fn backing_store(&self) -> &BackingStore {
        &self.backing_store
    }

    /// Current counters.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Current reference clock value.
    pub const fn clock(&self) -> u64 {
        self.stats.pages_referenced
    }

    /// Enables or disables per-access debug events.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Returns `true` if per-access debug events are enabled.
    pub const fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Maps an access record to its page, checking it against the page table.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::PageOutOfRange`] if the page is beyond the page table.
    pub fn translate(&self, record: &AccessRecord) -> Result<PageNumber, TraceError> {
        let page = page_of(record.addr, self.config.page_size);
        if self.pages.contains(page) {
            Ok(page)
        } else {
            Err(TraceError::PageOutOfRange {
                page,
                num_pages: self.pages.len(),
            })
        }
    }

    /// Processes one access to `page` without lookahead.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::LookaheadRequired`] if the policy is OPTIMAL, and
    /// [`TraceError::PageOutOfRange`] if `page` is beyond the page table, and
    /// [`SimError::NoVictim`] if the policy fails to name an occupied frame. State is
    /// left untouched on error.
    pub fn access(&mut self, op: Operation, page: PageNumber) -> Result<Outcome, SimError> {
        if self.policy.needs_lookahead() {
            return Err(SimError::LookaheadRequired);
        }
        if !self.pages.contains(page) {
            return Err(TraceError::PageOutOfRange {
                page,
                num_pages: self.pages.len(),
            }
            .into());
        }
        self.step(op, page, &[])
    }

    /// Translates and processes one access record without lookahead.
    ///
    /// # Errors
    ///
    /// As [`Simulator::translate`] and [`Simulator::access`].
    pub fn access_record(&mut self, record: &AccessRecord) -> Result<Outcome, SimError> {
        if self.verbose {
            debug!(op = %record.op, addr = %record.addr, "access");
        }
        let page = self.translate(record)?;
        self.access(record.op, page)
    }

    /// Processes a whole trace with full lookahead. Works for every policy.
    ///
    /// # Errors
    ///
    /// Every record is translated before the first access is simulated, so an
    /// out-of-range record fails the batch without changing any state. A
    /// [`SimError::NoVictim`] stops the batch at the failing record.
    pub fn run_batch(&mut self, records: &[AccessRecord]) -> Result<Vec<Outcome>, SimError> {
        self.run_batch_with(records, |_, _| {})
    }

    /// Like [`Simulator::run_batch`], calling `on_step(i, self)` after record `i`.
    ///
    /// # Errors
    ///
    /// As [`Simulator::run_batch`].
    pub fn run_batch_with<F>(
        &mut self,
        records: &[AccessRecord],
        mut on_step: F,
    ) -> Result<Vec<Outcome>, SimError>
    where
        F: FnMut(usize, &mut Self),
    {
        let pages = records
            .iter()
            .map(|r| self.translate(r))
            .collect::<Result<Vec<_>, _>>()?;

        let mut outcomes = Vec::with_capacity(records.len());
        for (i, (record, &page)) in records.iter().zip(&pages).enumerate() {
            if self.verbose {
                debug!(index = i, op = %record.op, addr = %record.addr, "access");
            }
            outcomes.push(self.step(record.op, page, &pages[i + 1..])?);
            on_step(i, &mut *self);
        }
        Ok(outcomes)
    }

    /// Recounts the pages that have ever been mapped and stores the gauge.
    pub fn recompute_mapped_count(&mut self) -> u64 {
        self.stats.pages_mapped = self.pages.mapped_count() as u64;
        self.stats.pages_mapped
    }

    /// Borrows the state for text rendering.
    pub const fn report(&self) -> StateReport<'_> {
        StateReport::new(&self.pages, &self.frames, &self.stats)
    }

    /// Borrows the configuration for the run banner.
    pub const fn banner(&self) -> ConfigBanner<'_> {
        ConfigBanner::new(&self.config)
    }

    /// Borrows the state for JSON rendering.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(&self.config, &self.stats, &self.pages, &self.frames)
    }

    fn step(
        &mut self,
        op: Operation,
        page: PageNumber,
        upcoming: &[PageNumber],
    ) -> Result<Outcome, SimError> {
        let now = self.stats.pages_referenced + 1;
        if self.verbose {
            debug!(clock = now, op = %op, page = %page, "translated");
        }

        if let Some(frame) = self.frames.find_page(page) {
            self.stats.pages_referenced = now;
            self.frames.touch(frame, now, op.is_write());
            if self.verbose {
                debug!(page = %page, frame = %frame, "page hit");
            }
            return Ok(Outcome::Hit { frame });
        }

        if let Some(frame) = self.frames.first_free() {
            self.stats.pages_referenced = now;
            self.stats.page_miss_instances += 1;
            if self.verbose {
                debug!(page = %page, frame = %frame, "page miss, empty frame found");
            }
            self.install(frame, page, op);
            let _ = self.recompute_mapped_count();
            return Ok(Outcome::Miss {
                frame,
                eviction: None,
            });
        }

        // Every frame is occupied; the victim must hold a page.
        let no_victim = SimError::NoVictim {
            policy: self.policy.kind(),
            page,
        };
        let Some(frame) = self.policy.get_victim(&self.frames, upcoming) else {
            return Err(no_victim);
        };
        let Some((victim, dirty)) = self.frames.release(frame) else {
            return Err(no_victim);
        };

        self.stats.pages_referenced = now;
        self.stats.page_miss_instances += 1;
        if self.verbose {
            debug!(
                page = %page,
                frame = %frame,
                policy = %self.policy.kind(),
                "page miss, victim selected"
            );
        }
        let eviction = self.evict(frame, victim, dirty, page);
        self.install(frame, page, op);
        let _ = self.recompute_mapped_count();
        Ok(Outcome::Miss {
            frame,
            eviction: Some(eviction),
        })
    }

    fn evict(
        &mut self,
        frame: FrameNumber,
        victim: PageNumber,
        dirty: bool,
        incoming: PageNumber,
    ) -> Eviction {
        let written_to_swap = dirty && self.backing_store.store(victim);
        if written_to_swap {
            self.stats.stolen_frames_written_to_swapspace += 1;
            if self.verbose {
                debug!(frame = %frame, page = %victim, "stolen frame written to swapspace");
            }
        }
        self.pages.mark_evicted(victim, written_to_swap);
        self.stats.frame_stolen_instances += 1;

        let recovered_from_swap = self.pages.awaiting_recovery(incoming);
        if recovered_from_swap {
            self.stats.stolen_frames_recovered_from_swapspace += 1;
            let _ = self.backing_store.recover(incoming);
            if self.verbose {
                debug!(page = %incoming, "page recovered from swapspace");
            }
        }

        Eviction {
            victim,
            written_to_swap,
            recovered_from_swap,
        }
    }

    fn install(&mut self, frame: FrameNumber, page: PageNumber, op: Operation) {
        let now = self.stats.pages_referenced;
        self.frames.install(frame, page, now, op.is_write());
        self.pages.mark_resident(page, frame);
        if self.verbose && op.is_write() {
            debug!(frame = %frame, "dirty bit set");
        }
    }
}
