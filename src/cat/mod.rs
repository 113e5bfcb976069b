//! CAT (Computer Aided Transceiver) command layer for the Yaesu frequency bridge.
//!
//! This module separates the three concerns of CAT communication:
//! - `encode`: translate VFO + frequency → wire bytes (pure, no I/O)
//! - `decode`: translate wire bytes → frequency / display string (pure, no I/O)
//! - `session`: own the serial port, drive flush/write/read and reconnect
//!
//! The encode/decode functions are pure so they can be tested without
//! any mock serial port.

pub mod decode;
pub mod encode;
pub mod session;

pub use decode::{display_frequency, format_mhz, parse_frequency};
pub use encode::{build_get, build_set};
pub use session::CatSession;

use crate::domain::{CatError, CatResult};

/// Every CAT command and response ends with this byte.
pub const TERMINATOR: u8 = b';';

/// The frequency payload is always exactly this many decimal digits.
pub const FREQ_DIGITS: usize = 9;

/// Largest frequency representable in a 9-digit payload.
pub const MAX_FREQ_HZ: i64 = 999_999_999;

/// The two VFO channels the radio exposes for frequency get/set.
/// Fixed set, never extended at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vfo {
    /// Main band, mnemonic "FA"
    Main,
    /// Sub band, mnemonic "FB"
    Sub,
}

impl Vfo {
    /// Poll order: Main first, then Sub.
    pub const ALL: [Vfo; 2] = [Vfo::Main, Vfo::Sub];

    /// The 2-character CAT command code for this channel.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Vfo::Main => "FA",
            Vfo::Sub => "FB",
        }
    }

    /// Resolve a mnemonic string from the outside world (HTTP body, config).
    /// Anything but an exact "FA"/"FB" is an `UnknownChannel` client error.
    pub fn from_mnemonic(s: &str) -> CatResult<Vfo> {
        match s {
            "FA" => Ok(Vfo::Main),
            "FB" => Ok(Vfo::Sub),
            other => Err(CatError::UnknownChannel(other.to_string())),
        }
    }
}
