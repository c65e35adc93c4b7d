//! Frame Table.
//!
//! A fixed array of physical frame descriptors. Besides the resident page, each frame
//! records the logical time its page was installed (`load_time`, read by FIFO) and the
//! time of the most recent access to it (`last_access_time`, read by LRU). Both are
//! values of the simulator's reference clock.

use serde::Serialize;

use crate::common::addr::{FrameNumber, PageNumber};

/// Frame table entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Frame identity; never changes.
    pub number: FrameNumber,
    /// Page held by the frame, or `None` while the frame is free.
    pub resident_page: Option<PageNumber>,
    /// Set by any write while the current page is resident.
    pub dirty: bool,
    /// Reference clock value when the current page was installed.
    pub load_time: u64,
    /// Reference clock value of the most recent access to the current page.
    pub last_access_time: u64,
}

impl Frame {
    fn new(number: FrameNumber) -> Self {
        Self {
            number,
            resident_page: None,
            dirty: false,
            load_time: 0,
            last_access_time: 0,
        }
    }

    /// Returns `true` if the frame holds a page.
    #[inline]
    pub const fn is_occupied(&self) -> bool {
        self.resident_page.is_some()
    }
}

/// Fixed-size table of frame descriptors.
#[derive(Clone, Debug)]
pub struct FrameTable {
    frames: Vec<Frame>,
}

impl FrameTable {
    /// Creates a table of `num_frames` free frames.
    pub fn new(num_frames: usize) -> Self {
        Self {
            frames: (0..num_frames).map(|i| Frame::new(FrameNumber(i))).collect(),
        }
    }

    /// Number of frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if the table has no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Looks up a frame descriptor.
    pub fn get(&self, frame: FrameNumber) -> Option<&Frame> {
        self.frames.get(frame.index())
    }

    /// Iterates over all frames in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// Iterates over occupied frames in index order.
    pub fn occupied(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().filter(|f| f.is_occupied())
    }

    /// Number of occupied frames.
    pub fn occupied_count(&self) -> usize {
        self.occupied().count()
    }

    /// Finds the frame currently holding `page`.
    pub fn find_page(&self, page: PageNumber) -> Option<FrameNumber> {
        self.frames
            .iter()
            .find(|f| f.resident_page == Some(page))
            .map(|f| f.number)
    }

    /// Returns the lowest-numbered free frame.
    pub fn first_free(&self) -> Option<FrameNumber> {
        self.frames
            .iter()
            .find(|f| !f.is_occupied())
            .map(|f| f.number)
    }

    /// Records a hit: refreshes the access time and sets the dirty bit on writes.
    pub fn touch(&mut self, frame: FrameNumber, now: u64, is_write: bool) {
        if let Some(entry) = self.frames.get_mut(frame.index()) {
            entry.last_access_time = now;
            if is_write {
                entry.dirty = true;
            }
        }
    }

    /// Installs `page` into `frame`, resetting its age, recency, and dirty bit.
    pub fn install(&mut self, frame: FrameNumber, page: PageNumber, now: u64, is_write: bool) {
        if let Some(entry) = self.frames.get_mut(frame.index()) {
            entry.resident_page = Some(page);
            entry.load_time = now;
            entry.last_access_time = now;
            entry.dirty = is_write;
        }
    }

    /// Frees `frame`, returning the page it held and whether it was dirty.
    pub fn release(&mut self, frame: FrameNumber) -> Option<(PageNumber, bool)> {
        let entry = self.frames.get_mut(frame.index())?;
        let page = entry.resident_page.take()?;
        let dirty = std::mem::take(&mut entry.dirty);
        Some((page, dirty))
    }
}
