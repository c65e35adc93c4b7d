//! Backing Store.
//!
//! Simulated swap space. Slots are addressed directly by page number: the dirty image of
//! page `p` always lives in slot `p`. This only works when there are at least as many
//! slots as pages, which [`Config::validate`](crate::config::Config::validate) enforces.

use crate::common::addr::PageNumber;

/// Fixed array of swap-space slots.
#[derive(Clone, Debug)]
pub struct BackingStore {
    slots: Vec<Option<PageNumber>>,
}

impl BackingStore {
    /// Creates a store of `num_slots` empty slots.
    pub fn new(num_slots: usize) -> Self {
        Self {
            slots: vec![None; num_slots],
        }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the store has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Writes the image of `page` to its slot.
    ///
    /// Returns `false` if the page has no slot.
    pub fn store(&mut self, page: PageNumber) -> bool {
        match self.slots.get_mut(page.index()) {
            Some(slot) => {
                *slot = Some(page);
                true
            }
            None => false,
        }
    }

    /// Clears the slot of `page`, returning the image it held.
    pub fn recover(&mut self, page: PageNumber) -> Option<PageNumber> {
        self.slots.get_mut(page.index()).and_then(Option::take)
    }

    /// Returns `true` if the slot of `page` holds an image.
    pub fn holds(&self, page: PageNumber) -> bool {
        matches!(self.slots.get(page.index()), Some(Some(_)))
    }

    /// Returns the occupant of slot `index`.
    pub fn slot(&self, index: usize) -> Option<PageNumber> {
        self.slots.get(index).copied().flatten()
    }

    /// Number of occupied slots.
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
