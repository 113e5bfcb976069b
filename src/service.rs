//! RadioService: the one object the rest of the process shares.
//!
//! Owns the CAT session (transport) and the display state, constructed
//! once at startup and handed out behind an `Arc`. The poller thread and
//! the web façade both go through it, so the transport lock discipline
//! lives in exactly one place.

use std::sync::{Mutex, MutexGuard};

use crate::cat::{build_set, display_frequency, CatSession, Vfo};
use crate::domain::{CatError, CatResult};
use crate::state::{DisplayState, FrequencySnapshot};

pub struct RadioService {
    session: Mutex<CatSession>,
    state: DisplayState,
}

impl RadioService {
    pub fn new(session: CatSession) -> Self {
        Self {
            session: Mutex::new(session),
            state: DisplayState::new(),
        }
    }

    /// Current Main/Sub display strings, atomically.
    pub fn snapshot(&self) -> FrequencySnapshot {
        self.state.snapshot()
    }

    /// Send a set-frequency command for the given channel mnemonic.
    ///
    /// Channel and range validation happens before any transport access,
    /// so a bad request is a client error even when the radio is
    /// unplugged. A closed transport yields a `Serial` error; the caller
    /// decides how to surface it.
    pub fn set_frequency(&self, channel: &str, hz: i64) -> CatResult<()> {
        let vfo = Vfo::from_mnemonic(channel)?;
        let wire = build_set(vfo, hz)?;

        let mut session = self.lock_session()?;
        session.send(&wire)
    }

    // --- Poll path (driven by the poller thread) ---

    pub fn transport_open(&self) -> bool {
        self.session
            .lock()
            .map(|s| s.is_open())
            .unwrap_or(false)
    }

    /// Single open attempt; the poller paces retries and backoff.
    pub fn open_transport(&self) -> CatResult<()> {
        self.lock_session()?.open()
    }

    /// One full poll exchange: query Main then Sub under a single session
    /// lock, publishing each non-empty response into the display state.
    /// An empty response (pure read timeout) leaves the previous value
    /// in place.
    pub fn poll_cycle(&self) -> CatResult<()> {
        let mut session = self.lock_session()?;
        for vfo in Vfo::ALL {
            let resp = session.query(vfo)?;
            if !resp.is_empty() {
                self.state.write(vfo, display_frequency(&resp));
            }
        }
        Ok(())
    }

    /// Surface a transport failure on both channels and drop the handle
    /// so the next poll iteration reopens.
    pub fn record_transport_error(&self, err: &CatError) {
        self.state.write_both(&format!("Error: {err}"));
        if let Ok(mut session) = self.session.lock() {
            session.close();
        }
    }

    fn lock_session(&self) -> CatResult<MutexGuard<'_, CatSession>> {
        self.session
            .lock()
            .map_err(|_| CatError::Serial("session state corrupted".to_string()))
    }
}
