//! Configuration system for the virtual memory simulator.
//!
//! This module defines the configuration record used to size the simulator. It provides:
//! 1. **Defaults:** Baseline table sizes used when a JSON document omits a field.
//! 2. **Structures:** The flat `Config` record (page size, frame/page/slot counts, policy).
//! 3. **Enums:** The page replacement policy selector.
//!
//! Configuration is read from the first non-comment line of a trace file
//! (`page_size num_frames num_pages num_backing_slots`) with the policy chosen on the
//! command line, or deserialized from JSON.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default page size in bytes (256 B).
    pub const PAGE_SIZE: usize = 256;

    /// Default number of physical frames.
    pub const NUM_FRAMES: usize = 4;

    /// Default number of virtual pages.
    pub const NUM_PAGES: usize = 16;

    /// Default number of swap-space slots (one per page).
    pub const NUM_BACKING_SLOTS: usize = NUM_PAGES;
}

/// Page replacement policy algorithms.
///
/// Specifies the algorithm used to select which resident page to evict when a page
/// fault occurs and every frame is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// First In First Out replacement policy.
    ///
    /// Evicts the page that has been resident the longest, regardless of later hits.
    #[default]
    #[serde(alias = "Fifo", alias = "fifo")]
    Fifo,
    /// Least Recently Used replacement policy.
    ///
    /// Evicts the page whose most recent access is oldest.
    #[serde(alias = "Lru", alias = "lru")]
    Lru,
    /// Optimal (Belady) replacement policy.
    ///
    /// Evicts the page whose next use lies farthest in the future. Needs the whole
    /// trace up front, so it only runs in batch mode.
    #[serde(alias = "Optimal", alias = "optimal", alias = "OPT")]
    Optimal,
}

impl ReplacementPolicy {
    /// All supported policies, in declaration order.
    pub const ALL: [Self; 3] = [Self::Fifo, Self::Lru, Self::Optimal];

    /// Returns the canonical upper-case name (`FIFO`, `LRU`, `OPTIMAL`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fifo => "FIFO",
            Self::Lru => "LRU",
            Self::Optimal => "OPTIMAL",
        }
    }

    /// Returns `true` if the policy needs the future suffix of the trace.
    pub const fn needs_lookahead(self) -> bool {
        matches!(self, Self::Optimal)
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReplacementPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIFO" => Ok(Self::Fifo),
            "LRU" => Ok(Self::Lru),
            "OPTIMAL" | "OPT" => Ok(Self::Optimal),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Simulator configuration.
///
/// All tables are allocated once from these sizes and never resized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Page size in bytes.
    #[serde(default = "Config::default_page_size")]
    pub page_size: usize,

    /// Number of physical frames.
    #[serde(default = "Config::default_num_frames")]
    pub num_frames: usize,

    /// Number of virtual pages (page table entries).
    #[serde(default = "Config::default_num_pages")]
    pub num_pages: usize,

    /// Number of backing-store slots; must be at least `num_pages`.
    #[serde(default = "Config::default_num_backing_slots", alias = "num_bs_blocks")]
    pub num_backing_slots: usize,

    /// Page replacement policy.
    #[serde(default)]
    pub policy: ReplacementPolicy,
}

impl Config {
    const HEADER_FIELDS: [&'static str; 4] =
        ["page size", "number of frames", "number of pages", "number of backing store blocks"];

    fn default_page_size() -> usize {
        defaults::PAGE_SIZE
    }

    fn default_num_frames() -> usize {
        defaults::NUM_FRAMES
    }

    fn default_num_pages() -> usize {
        defaults::NUM_PAGES
    }

    fn default_num_backing_slots() -> usize {
        defaults::NUM_BACKING_SLOTS
    }

    /// Creates a configuration from explicit sizes. Does not validate.
    pub const fn new(
        page_size: usize,
        num_frames: usize,
        num_pages: usize,
        num_backing_slots: usize,
        policy: ReplacementPolicy,
    ) -> Self {
        Self {
            page_size,
            num_frames,
            num_pages,
            num_backing_slots,
            policy,
        }
    }

    /// Parses a trace header line: `page_size num_frames num_pages num_backing_slots`.
    ///
    /// Tokens beyond the fourth are ignored.
    ///
    /// # Arguments
    ///
    /// * `line` - The first non-comment line of a trace.
    /// * `policy` - Replacement policy chosen by the caller.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first missing, non-numeric, or
    /// non-positive field, or any error from [`Config::validate`].
    pub fn from_header(line: &str, policy: ReplacementPolicy) -> Result<Self, ConfigError> {
        let mut tokens = line.split_whitespace();
        let mut sizes = [0usize; 4];
        for (slot, field) in sizes.iter_mut().zip(Self::HEADER_FIELDS) {
            let token = tokens.next().ok_or(ConfigError::Missing { field })?;
            let value: i64 = token.parse().map_err(|_| ConfigError::NotANumber {
                field,
                value: token.to_string(),
            })?;
            if value <= 0 {
                return Err(ConfigError::NonPositive { field });
            }
            *slot = usize::try_from(value).map_err(|_| ConfigError::NotANumber {
                field,
                value: token.to_string(),
            })?;
        }

        let [page_size, num_frames, num_pages, num_backing_slots] = sizes;
        let config = Self::new(page_size, num_frames, num_pages, num_backing_slots, policy);
        config.validate()?;
        Ok(config)
    }

    /// Deserializes and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is malformed, or any error from
    /// [`Config::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, deserializes, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_json_str`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that every size is positive and that the backing store can hold one
    /// image per page.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositive`] for a zero size, or
    /// [`ConfigError::BackingStoreTooSmall`] if `num_backing_slots < num_pages`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            self.page_size,
            self.num_frames,
            self.num_pages,
            self.num_backing_slots,
        ];
        for (value, field) in sizes.into_iter().zip(Self::HEADER_FIELDS) {
            if value == 0 {
                return Err(ConfigError::NonPositive { field });
            }
        }

        if self.num_backing_slots < self.num_pages {
            return Err(ConfigError::BackingStoreTooSmall {
                slots: self.num_backing_slots,
                pages: self.num_pages,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
            num_frames: Self::default_num_frames(),
            num_pages: Self::default_num_pages(),
            num_backing_slots: Self::default_num_backing_slots(),
            policy: ReplacementPolicy::default(),
        }
    }
}
