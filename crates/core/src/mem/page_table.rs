//! Page Table.
//!
//! A fixed array of page descriptors indexed by page number. The page table owns the
//! page-level lifecycle: a page starts out never mapped, becomes resident when it is
//! faulted into a frame, and is evicted when its frame is reclaimed. An evicted page
//! remembers whether its last eviction wrote a dirty image to the backing store.

use serde::Serialize;

use crate::common::addr::{FrameNumber, PageNumber};

/// Lifecycle state of a virtual page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
pub enum PageState {
    /// The page has never been referenced.
    #[default]
    NeverMapped,
    /// The page was resident once and its frame has since been reclaimed.
    Evicted,
    /// The page currently occupies a frame.
    Resident,
}

impl PageState {
    /// Returns the label used in state reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::NeverMapped => "UNUSED",
            Self::Evicted => "STOLEN",
            Self::Resident => "MAPPED",
        }
    }
}

/// Page table entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Page identity; never changes.
    pub number: PageNumber,
    /// Current lifecycle state.
    pub state: PageState,
    /// Frame holding the page; `Some` exactly when `state` is `Resident`.
    pub frame: Option<FrameNumber>,
    /// `true` if the last eviction wrote a dirty image that has not been recovered yet.
    pub on_disk: bool,
}

impl Page {
    fn new(number: PageNumber) -> Self {
        Self {
            number,
            state: PageState::NeverMapped,
            frame: None,
            on_disk: false,
        }
    }

    /// Returns `true` if the page occupies a frame.
    #[inline]
    pub fn is_resident(&self) -> bool {
        self.state == PageState::Resident
    }

    /// Returns `true` if the page has ever been referenced.
    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.state != PageState::NeverMapped
    }
}

/// Fixed-size table of page descriptors.
#[derive(Clone, Debug)]
pub struct PageTable {
    pages: Vec<Page>,
}

impl PageTable {
    /// Creates a table of `num_pages` never-mapped pages.
    pub fn new(num_pages: usize) -> Self {
        Self {
            pages: (0..num_pages).map(|i| Page::new(PageNumber(i))).collect(),
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns `true` if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Returns `true` if `page` indexes an entry of this table.
    #[inline]
    pub fn contains(&self, page: PageNumber) -> bool {
        page.index() < self.pages.len()
    }

    /// Looks up a page descriptor.
    pub fn get(&self, page: PageNumber) -> Option<&Page> {
        self.pages.get(page.index())
    }

    /// Iterates over all descriptors in page-number order.
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    /// Counts pages that have ever been referenced (resident or evicted).
    pub fn mapped_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_mapped()).count()
    }

    /// Counts resident pages.
    pub fn resident_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_resident()).count()
    }

    /// Records that `page` now lives in `frame`; clears its on-disk flag.
    pub fn mark_resident(&mut self, page: PageNumber, frame: FrameNumber) {
        if let Some(entry) = self.pages.get_mut(page.index()) {
            entry.state = PageState::Resident;
            entry.frame = Some(frame);
            entry.on_disk = false;
        }
    }

    /// Records that `page` lost its frame.
    ///
    /// A dirty eviction sets the on-disk flag; a clean one leaves it unchanged.
    pub fn mark_evicted(&mut self, page: PageNumber, written_to_disk: bool) {
        if let Some(entry) = self.pages.get_mut(page.index()) {
            entry.state = PageState::Evicted;
            entry.frame = None;
            if written_to_disk {
                entry.on_disk = true;
            }
        }
    }

    /// Returns `true` if `page` is evicted with an unrecovered image in swap space.
    pub fn awaiting_recovery(&self, page: PageNumber) -> bool {
        self.get(page)
            .is_some_and(|p| p.on_disk && p.frame.is_none())
    }
}
