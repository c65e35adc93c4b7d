//! Common utilities and types used throughout the simulator.
//!
//! This module provides the building blocks shared by the tables, the policies and the
//! simulator itself:
//! 1. **Address Types:** Strong types for virtual addresses, page numbers, and frame numbers.
//! 2. **Access Records:** The `r`/`w` operation codes and hexadecimal offsets read from a trace.
//! 3. **Error Handling:** Configuration, trace, and simulation error types.

/// Address and table index types.
pub mod addr;

/// Memory access records and operation codes.
pub mod access;

/// Error types.
pub mod error;

pub use access::{AccessRecord, Operation};
pub use addr::{FrameNumber, PageNumber, VirtAddr, page_of};
pub use error::{ConfigError, SimError, TraceError};
