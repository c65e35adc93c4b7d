//! Memory Access Records.
//!
//! This module defines the access records that drive the simulator. They are used for:
//! 1. **Trace Parsing:** Decoding `r<hex>` / `w<hex>` lines into typed records.
//! 2. **Dirty Tracking:** Writes set the dirty bit of the frame holding the page.

use std::fmt;
use std::str::FromStr;

use super::addr::VirtAddr;
use super::error::TraceError;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Data read access (`r`).
    Read,

    /// Data write access (`w`).
    ///
    /// Marks the frame dirty, so the page is written to swap space when evicted.
    Write,
}

impl Operation {
    /// Decodes a one-character operation code.
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'r' => Some(Self::Read),
            'w' => Some(Self::Write),
            _ => None,
        }
    }

    /// Returns the one-character operation code.
    pub const fn code(self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
        }
    }

    /// Returns `true` for write accesses.
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single memory access read from a trace: an operation and a virtual address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessRecord {
    /// Read or write.
    pub op: Operation,
    /// Address being accessed.
    pub addr: VirtAddr,
}

impl AccessRecord {
    /// Creates a new access record.
    pub const fn new(op: Operation, addr: u64) -> Self {
        Self {
            op,
            addr: VirtAddr(addr),
        }
    }

    /// Shorthand for a read of `addr`.
    pub const fn read(addr: u64) -> Self {
        Self::new(Operation::Read, addr)
    }

    /// Shorthand for a write to `addr`.
    pub const fn write(addr: u64) -> Self {
        Self::new(Operation::Write, addr)
    }

    /// Parses a trace line of the form `<op><hex>`.
    ///
    /// The first non-blank character is the operation code; the remainder, trimmed, is a
    /// hexadecimal offset with an optional `0x` prefix (`r1f`, `w 0x2000`).
    ///
    /// # Arguments
    ///
    /// * `line` - The raw trace line.
    /// * `line_no` - 1-based line number used in error reports.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::MalformedRecord`] for an unknown operation code, a missing
    /// offset, or a non-hexadecimal offset.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self, TraceError> {
        let malformed = || TraceError::MalformedRecord {
            line_no,
            line: line.to_string(),
        };

        let trimmed = line.trim();
        let mut chars = trimmed.chars();
        let op = chars
            .next()
            .and_then(Operation::from_code)
            .ok_or_else(malformed)?;

        let rest = chars.as_str().trim();
        let digits = rest
            .strip_prefix("0x")
            .or_else(|| rest.strip_prefix("0X"))
            .unwrap_or(rest);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed());
        }

        let addr = u64::from_str_radix(digits, 16).map_err(|_| malformed())?;
        Ok(Self::new(op, addr))
    }
}

impl FromStr for AccessRecord {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s, 0)
    }
}

impl fmt::Display for AccessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:x}", self.op, self.addr.0)
    }
}
