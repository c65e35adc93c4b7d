//! Virtual address, page number, and frame number types.
//!
//! This module defines strong types so that raw addresses, page table indices, and
//! frame table indices cannot be mixed up. It provides the following:
//! 1. **Type Safety:** Distinguishes addresses from page and frame indices at compile time.
//! 2. **Translation:** Maps a virtual address to its page number for a given page size.

use std::fmt;

use serde::Serialize;

/// A virtual address as it appears in an access trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VirtAddr(pub u64);

/// Index of a virtual page in the page table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PageNumber(pub usize);

/// Index of a physical frame in the frame table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FrameNumber(pub usize);

impl VirtAddr {
    /// Returns the raw 64-bit address value.
    #[inline]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Returns the byte offset of this address inside its page.
    pub fn page_offset(&self, page_size: usize) -> u64 {
        self.0 % page_size as u64
    }
}

impl PageNumber {
    /// Returns the raw table index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl FrameNumber {
    /// Returns the raw table index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Computes `floor(addr / page_size)`.
///
/// Addresses whose page number does not fit in `usize` saturate to `usize::MAX`, which
/// the simulator's bounds check then rejects as out of range.
///
/// # Arguments
///
/// * `addr` - The virtual address to translate.
/// * `page_size` - Page size in bytes; must be non-zero.
pub fn page_of(addr: VirtAddr, page_size: usize) -> PageNumber {
    let page = addr.0 / page_size as u64;
    PageNumber(usize::try_from(page).unwrap_or(usize::MAX))
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FrameNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
