//! Core domain types
//!
//! Pure types with no I/O dependencies: the error taxonomy, runtime
//! configuration, and the serial port descriptor.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;
