//! Shared display state
//!
//! The two latest display strings, one per VFO, behind a single mutex so a
//! snapshot is atomic with respect to the poller's writes. No history and
//! no subscriptions — streaming consumers re-read the snapshot and diff.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::cat::Vfo;

/// Placeholder shown before the first successful poll.
pub const UNKNOWN: &str = "Unknown";

/// The pair of display strings served to the web UI. The JSON field names
/// are the wire contract the page's script expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencySnapshot {
    /// Main band (VFO "FA")
    #[serde(rename = "frequency")]
    pub main: String,
    /// Sub band (VFO "FB")
    #[serde(rename = "frequency_b")]
    pub sub: String,
}

/// Mutex-protected snapshot storage, overwritten in place by the poller.
pub struct DisplayState {
    inner: Mutex<FrequencySnapshot>,
}

impl DisplayState {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(FrequencySnapshot {
                main: UNKNOWN.to_string(),
                sub: UNKNOWN.to_string(),
            }),
        }
    }

    /// Current Main/Sub strings, read atomically.
    pub fn snapshot(&self) -> FrequencySnapshot {
        self.inner.lock().unwrap().clone()
    }

    /// Overwrite one channel's display string.
    pub fn write(&self, vfo: Vfo, value: String) {
        let mut inner = self.inner.lock().unwrap();
        match vfo {
            Vfo::Main => inner.main = value,
            Vfo::Sub => inner.sub = value,
        }
    }

    /// Overwrite both channels, used when the transport as a whole fails.
    pub fn write_both(&self, value: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.main = value.to_string();
        inner.sub = value.to_string();
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}
