//! Pure decoding: CAT wire bytes → frequency / display string.
//!
//! No I/O, no side effects. The radio's reply to `FA;` looks like
//! `FA014250000;`, but the link can prepend garbage or echo bytes, so the
//! parser scans the whole response for the first 9-digit group instead of
//! anchoring on the mnemonic.

use std::sync::OnceLock;

use regex::bytes::Regex;

use crate::domain::{CatError, CatResult};

static FREQ_PATTERN: OnceLock<Regex> = OnceLock::new();

fn freq_pattern() -> &'static Regex {
    FREQ_PATTERN.get_or_init(|| {
        Regex::new(r"[0-9]{9}").expect("frequency pattern compiles")
    })
}

/// Extract the frequency in Hz from a raw response.
///
/// Takes the leftmost run of 9 consecutive ASCII digits anywhere in the
/// bytes; a longer digit run still matches through its first 9 digits.
/// Returns `NoFrequencyFound` when no such group exists.
pub fn parse_frequency(resp: &[u8]) -> CatResult<u64> {
    let m = freq_pattern()
        .find(resp)
        .ok_or(CatError::NoFrequencyFound)?;
    let digits =
        std::str::from_utf8(m.as_bytes()).map_err(|_| CatError::NoFrequencyFound)?;
    digits.parse::<u64>().map_err(|_| CatError::NoFrequencyFound)
}

/// Render a frequency for the UI, e.g. 14_250_000 → `"14.25000 MHz"`.
pub fn format_mhz(hz: u64) -> String {
    format!("{:.5} MHz", hz as f64 / 1_000_000.0)
}

/// Turn a raw poll response into the string the UI shows.
///
/// Parsed responses become `"X.XXXXX MHz"`. A malformed response degrades
/// to a best-effort lossy decode of the raw bytes, or `"Invalid"` when even
/// that is empty — it is displayed, never retried.
pub fn display_frequency(resp: &[u8]) -> String {
    match parse_frequency(resp) {
        Ok(hz) => format_mhz(hz),
        Err(_) => {
            let raw = String::from_utf8_lossy(resp).trim().to_string();
            if raw.is_empty() {
                "Invalid".to_string()
            } else {
                raw
            }
        }
    }
}
