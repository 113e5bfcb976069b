//! Pure encoding: VFO + frequency → CAT wire bytes.
//!
//! No I/O, no side effects. Easy to unit-test without any serial port.

use crate::domain::{CatError, CatResult};

use super::{Vfo, FREQ_DIGITS, MAX_FREQ_HZ};

/// Build the "get frequency" query for a channel, e.g. `b"FA;"`.
pub fn build_get(vfo: Vfo) -> Vec<u8> {
    format!("{};", vfo.mnemonic()).into_bytes()
}

/// Build the "set frequency" command for a channel, e.g. `b"FA014250000;"`.
///
/// The radio expects the frequency as a zero-padded 9-digit decimal (Hz)
/// immediately following the mnemonic. Anything outside that digit range
/// is an `InvalidFrequency` client error before a byte hits the wire.
pub fn build_set(vfo: Vfo, hz: i64) -> CatResult<Vec<u8>> {
    if !(0..=MAX_FREQ_HZ).contains(&hz) {
        return Err(CatError::InvalidFrequency(hz));
    }
    Ok(format!("{}{hz:0width$};", vfo.mnemonic(), width = FREQ_DIGITS).into_bytes())
}
