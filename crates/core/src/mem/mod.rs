//! Memory tables.
//!
//! The simulator's state lives in three fixed-size tables allocated once at construction:
//! 1. **Page Table:** One descriptor per virtual page (never mapped, resident, or evicted).
//! 2. **Frame Table:** One descriptor per physical frame (occupant, dirty bit, age, recency).
//! 3. **Backing Store:** Swap-space slots addressed directly by page number.

/// Swap-space model.
pub mod backing_store;

/// Physical frame descriptors.
pub mod frame_table;

/// Virtual page descriptors.
pub mod page_table;

pub use backing_store::BackingStore;
pub use frame_table::{Frame, FrameTable};
pub use page_table::{Page, PageState, PageTable};
