//! Adapters (external I/O)
//!
//! Implementations of the port traits against real hardware.

pub mod serial_port;

pub use serial_port::{SerialPortConnection, SerialPortFactory};
