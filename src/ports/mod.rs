//! Port traits (interfaces)
//!
//! These traits define the boundary between the core and the physical
//! serial link. Adapters implement them against real hardware; tests
//! implement them in memory.

pub mod serial;

pub use serial::*;
