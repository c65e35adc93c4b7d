//! Error definitions.
//!
//! This module defines the error types reported by the simulator. It provides:
//! 1. **Configuration Errors:** Invalid sizes, unknown policies, and undersized swap space.
//! 2. **Trace Errors:** Unparseable access records and page numbers outside the page table.
//! 3. **Simulation Errors:** The union of both, plus misuse of the streaming interface.
//!
//! Every error is fatal for the run it occurs in: the simulation is a deterministic
//! function of configuration and trace, so there is nothing to retry.

use std::io;

use thiserror::Error;

use super::addr::PageNumber;
use crate::config::ReplacementPolicy;

/// Errors raised while building or validating a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The trace was loaded without a header line, so the sizes must come from JSON.
    #[error("trace has no configuration header; pass a JSON configuration instead")]
    NoHeader,

    /// A header field was absent.
    #[error("missing {field} in configuration header")]
    Missing {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A header field was not an integer.
    #[error("invalid {field}: {value:?} is not a number")]
    NotANumber {
        /// Name of the offending field.
        field: &'static str,
        /// The text that failed to parse.
        value: String,
    },

    /// A size was zero or negative.
    #[error("invalid {field}: must be greater than zero")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The replacement policy name was not recognised.
    #[error("unknown replacement policy {0:?} (expected FIFO, LRU or OPTIMAL)")]
    UnknownPolicy(String),

    /// Swap slots are addressed by page number, so there must be one per page.
    #[error("backing store has {slots} slots but the page table has {pages} pages")]
    BackingStoreTooSmall {
        /// Configured number of backing-store slots.
        slots: usize,
        /// Configured number of pages.
        pages: usize,
    },

    /// A JSON configuration document could not be decoded.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while reading or translating trace records.
#[derive(Debug, Error)]
pub enum TraceError {
    /// An access line could not be decoded.
    #[error("line {line_no}: malformed access record {line:?}")]
    MalformedRecord {
        /// 1-based line number in the trace (0 when parsed outside a trace).
        line_no: usize,
        /// The offending line.
        line: String,
    },

    /// The address maps to a page beyond the end of the page table.
    #[error("page {page} is outside the page table (0..{num_pages})")]
    PageOutOfRange {
        /// Page number computed from the address.
        page: PageNumber,
        /// Size of the page table.
        num_pages: usize,
    },

    /// The trace contained no configuration header line.
    #[error("trace has no configuration header")]
    MissingHeader,

    /// The trace file could not be read.
    #[error("cannot read trace: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised by the [`Simulator`](crate::sim::Simulator).
#[derive(Debug, Error)]
pub enum SimError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A trace record was rejected.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// The optimal policy needs the whole trace; use the batch entry point instead.
    #[error("the OPTIMAL policy needs the full trace; use run_batch instead of access")]
    LookaheadRequired,

    /// The replacement policy returned no frame, or a frame that holds no page, while
    /// every frame was occupied.
    #[error("replacement policy {policy} chose no victim for page {page}")]
    NoVictim {
        /// Policy that made the choice.
        policy: ReplacementPolicy,
        /// Page that faulted.
        page: PageNumber,
    },
}
