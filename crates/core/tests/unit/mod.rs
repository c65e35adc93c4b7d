//! # Unit Components
//!
//! Groups the tests by component, from the address translator up to full traces.


/// Error messages.
pub mod error;




/// The hit/miss/evict/install pipeline.
pub mod simulator;
