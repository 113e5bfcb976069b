//! Serial port traits
//!
//! Split into two traits:
//! - `SerialFactory` — static methods for listing and opening ports
//! - `SerialConnection` — instance methods for reading/writing data

use crate::domain::{CatResult, SerialPortInfo};

/// Factory for creating serial connections.
pub trait SerialFactory {
    /// List available serial ports on the system
    fn list_ports() -> CatResult<Vec<SerialPortInfo>>;

    /// Open a serial port at the given baud rate, returning a boxed connection
    fn open(port: &str, baud_rate: u32) -> CatResult<Box<dyn SerialConnection>>;
}

/// Trait for an open serial port connection.
/// Only requires `Send` (not `Sync`) — always accessed behind a Mutex.
pub trait SerialConnection: Send {
    /// Write bytes to the port
    fn write(&mut self, data: &[u8]) -> CatResult<usize>;

    /// Read bytes from the port. Returns `Ok(0)` when the read timed out
    /// with nothing available; `Err` means the link itself failed.
    fn read(&mut self, buffer: &mut [u8]) -> CatResult<usize>;

    /// Discard any buffered unread input, so a fresh query is not paired
    /// with a stale prior response
    fn flush_input(&mut self) -> CatResult<()>;

    /// Close the connection
    fn close(&mut self) -> CatResult<()>;

    /// Check if the port is still connected
    fn is_connected(&self) -> bool;
}
