//! CatSession: owns the serial connection and drives CAT I/O.
//!
//! One session exists for the whole process. The poller and the web
//! façade's set-frequency path share it behind a single mutex, so a poll
//! exchange (flush → write → read) can never interleave with a set
//! command on the wire.
//!
//! Pure translation lives in `encode` / `decode`. CatSession only handles
//! I/O and the open/closed lifecycle; reconnect backoff is paced by the
//! poller so nothing sleeps while holding the session lock.

use crate::domain::{CatError, CatResult};
use crate::ports::SerialConnection;

use super::{build_get, Vfo, TERMINATOR};

/// Chunk size for each serial read call
const READ_CHUNK_SIZE: usize = 64;

/// Max read attempts per response (~200ms timeout each)
const RESPONSE_TIMEOUT_READS: usize = 5;

/// How the session obtains a fresh connection after a disconnect.
pub type SerialOpener = Box<dyn Fn() -> CatResult<Box<dyn SerialConnection>> + Send>;

/// Owns the (possibly absent) serial connection and executes CAT exchanges.
pub struct CatSession {
    opener: SerialOpener,
    serial: Option<Box<dyn SerialConnection>>,
}

impl CatSession {
    /// Create a session with no open connection yet; `opener` is invoked
    /// on every `open()` call.
    pub fn new(opener: SerialOpener) -> Self {
        Self {
            opener,
            serial: None,
        }
    }

    /// Create a session around an already-open connection. Used by tests;
    /// a later `open()` after a transport error re-invokes the opener.
    pub fn with_connection(opener: SerialOpener, serial: Box<dyn SerialConnection>) -> Self {
        Self {
            opener,
            serial: Some(serial),
        }
    }

    pub fn is_open(&self) -> bool {
        self.serial.as_ref().is_some_and(|s| s.is_connected())
    }

    /// Single attempt to (re)open the physical link. A fresh attempt is
    /// made even if a stale handle is still around.
    pub fn open(&mut self) -> CatResult<()> {
        self.close();
        self.serial = Some((self.opener)()?);
        Ok(())
    }

    /// Run one get-frequency exchange: flush stale input, write the query,
    /// read until the `;` terminator or timeout.
    ///
    /// Returns the accumulated response bytes — possibly empty if the
    /// timeout fired first, possibly unterminated. `Err` means the link
    /// itself failed and the caller should close and reopen.
    pub fn query(&mut self, vfo: Vfo) -> CatResult<Vec<u8>> {
        let wire = build_get(vfo);
        let serial = self.serial.as_mut().ok_or_else(Self::not_open)?;

        // Drop any stale buffered response so this query is paired with
        // its own reply; a failed flush is non-fatal
        if let Err(e) = serial.flush_input() {
            log::debug!("input flush failed (ignored): {e}");
        }

        log::debug!("CAT TX: {}", String::from_utf8_lossy(&wire));
        serial.write(&wire)?;

        let resp = read_until_terminator(serial.as_mut())?;
        log::debug!("CAT RX: {}", String::from_utf8_lossy(&resp));
        Ok(resp)
    }

    /// Write a prebuilt command (the set-frequency path). The radio sends
    /// no reply to a set, so this is write-only.
    pub fn send(&mut self, wire: &[u8]) -> CatResult<()> {
        let serial = self.serial.as_mut().ok_or_else(Self::not_open)?;
        log::debug!("CAT TX: {}", String::from_utf8_lossy(wire));
        serial.write(wire)?;
        Ok(())
    }

    /// Release the underlying connection; no-op when already closed.
    pub fn close(&mut self) {
        if let Some(mut serial) = self.serial.take() {
            let _ = serial.close();
        }
    }

    fn not_open() -> CatError {
        CatError::Serial("serial port not open".to_string())
    }
}

/// Read until a `;` shows up or the per-response read budget is spent.
/// Zero-byte reads are timeouts; only a hard I/O error propagates.
fn read_until_terminator(serial: &mut dyn SerialConnection) -> CatResult<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::with_capacity(READ_CHUNK_SIZE);
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    for _ in 0..RESPONSE_TIMEOUT_READS {
        let n = serial.read(&mut chunk)?;
        if n > 0 {
            buf.extend_from_slice(&chunk[..n]);
            if buf.contains(&TERMINATOR) {
                break;
            }
        }
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    // ---------------------------------------------------------------------------
    // MockSerial for CatSession tests
    // ---------------------------------------------------------------------------

    struct MockSerial {
        log: Arc<Mutex<Vec<String>>>,
        response: Vec<u8>,
        cursor: usize,
        fail_reads: bool,
    }

    impl MockSerial {
        fn new(log: Arc<Mutex<Vec<String>>>, response: &[u8]) -> Self {
            Self {
                log,
                response: response.to_vec(),
                cursor: 0,
                fail_reads: false,
            }
        }
    }

    impl SerialConnection for MockSerial {
        fn write(&mut self, data: &[u8]) -> CatResult<usize> {
            self.log
                .lock()
                .unwrap()
                .push(format!("write:{}", String::from_utf8_lossy(data)));
            Ok(data.len())
        }
        fn read(&mut self, buf: &mut [u8]) -> CatResult<usize> {
            if self.fail_reads {
                return Err(CatError::Serial("device unplugged".into()));
            }
            if self.cursor >= self.response.len() {
                return Ok(0); // timeout
            }
            let rest = &self.response[self.cursor..];
            let n = rest.len().min(buf.len());
            buf[..n].copy_from_slice(&rest[..n]);
            self.cursor += n;
            Ok(n)
        }
        fn flush_input(&mut self) -> CatResult<()> {
            self.log.lock().unwrap().push("flush".into());
            Ok(())
        }
        fn close(&mut self) -> CatResult<()> {
            self.log.lock().unwrap().push("close".into());
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
    }

    fn never_reopens() -> SerialOpener {
        Box::new(|| Err(CatError::Serial("no port in tests".into())))
    }

    fn make_session(response: &[u8]) -> (CatSession, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mock = MockSerial::new(Arc::clone(&log), response);
        (
            CatSession::with_connection(never_reopens(), Box::new(mock)),
            log,
        )
    }

    // --- Basic exchange ---

    #[test]
    fn query_main_sends_fa_and_returns_response() {
        let (mut session, log) = make_session(b"FA014250000;");
        let resp = session.query(Vfo::Main).unwrap();
        assert_eq!(resp, b"FA014250000;");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["flush".to_string(), "write:FA;".to_string()]
        );
    }

    #[test]
    fn query_sub_sends_fb() {
        let (mut session, log) = make_session(b"FB007100000;");
        session.query(Vfo::Sub).unwrap();
        assert!(log.lock().unwrap().contains(&"write:FB;".to_string()));
    }

    #[test]
    fn query_flushes_before_writing() {
        let (mut session, log) = make_session(b"FA014250000;");
        session.query(Vfo::Main).unwrap();
        let log = log.lock().unwrap();
        let flush_pos = log.iter().position(|e| e == "flush").unwrap();
        let write_pos = log.iter().position(|e| e.starts_with("write:")).unwrap();
        assert!(flush_pos < write_pos);
    }

    #[test]
    fn query_timeout_returns_empty() {
        let (mut session, _) = make_session(b"");
        let resp = session.query(Vfo::Main).unwrap();
        assert!(resp.is_empty());
    }

    #[test]
    fn query_returns_partial_response_without_terminator() {
        let (mut session, _) = make_session(b"FA0142");
        assert_eq!(session.query(Vfo::Main).unwrap(), b"FA0142");
    }

    #[test]
    fn query_read_error_propagates() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut mock = MockSerial::new(Arc::clone(&log), b"");
        mock.fail_reads = true;
        let mut session = CatSession::with_connection(never_reopens(), Box::new(mock));
        assert!(matches!(
            session.query(Vfo::Main),
            Err(CatError::Serial(_))
        ));
    }

    #[test]
    fn query_without_open_port_is_serial_error() {
        let mut session = CatSession::new(never_reopens());
        assert!(matches!(session.query(Vfo::Main), Err(CatError::Serial(_))));
    }

    // --- Set path ---

    #[test]
    fn send_writes_exact_bytes() {
        let (mut session, log) = make_session(b"");
        session.send(b"FA014250000;").unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["write:FA014250000;".to_string()]);
    }

    #[test]
    fn send_when_closed_is_serial_error() {
        let mut session = CatSession::new(never_reopens());
        assert!(matches!(
            session.send(b"FA014250000;"),
            Err(CatError::Serial(_))
        ));
    }

    // --- Lifecycle ---

    #[test]
    fn open_invokes_opener_and_reports_open() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let opener_log = Arc::clone(&log);
        let opener: SerialOpener = Box::new(move || {
            Ok(Box::new(MockSerial::new(Arc::clone(&opener_log), b""))
                as Box<dyn SerialConnection>)
        });
        let mut session = CatSession::new(opener);
        assert!(!session.is_open());
        session.open().unwrap();
        assert!(session.is_open());
    }

    #[test]
    fn open_failure_leaves_session_closed() {
        let mut session = CatSession::new(never_reopens());
        assert!(session.open().is_err());
        assert!(!session.is_open());
    }

    #[test]
    fn close_is_idempotent() {
        let (mut session, log) = make_session(b"");
        session.close();
        session.close();
        assert_eq!(*log.lock().unwrap(), vec!["close".to_string()]);
        assert!(!session.is_open());
    }

    // --- Long response (accumulation across reads) ---

    /// A mock that streams its response one byte at a time, stressing the
    /// accumulation loop the same way a slow USB-serial adapter does.
    struct StreamingMockSerial {
        response: Vec<u8>,
        cursor: usize,
    }

    impl SerialConnection for StreamingMockSerial {
        fn write(&mut self, data: &[u8]) -> CatResult<usize> {
            Ok(data.len())
        }
        fn read(&mut self, buf: &mut [u8]) -> CatResult<usize> {
            if self.cursor >= self.response.len() {
                return Ok(0);
            }
            buf[0] = self.response[self.cursor];
            self.cursor += 1;
            Ok(1)
        }
        fn flush_input(&mut self) -> CatResult<()> {
            Ok(())
        }
        fn close(&mut self) -> CatResult<()> {
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
    }

    #[test]
    fn response_accumulated_across_partial_reads() {
        let serial = StreamingMockSerial {
            // 5 reads available before the budget runs out; the terminator
            // arrives within it
            response: b"FA01;".to_vec(),
            cursor: 0,
        };
        let mut session = CatSession::with_connection(never_reopens(), Box::new(serial));
        assert_eq!(session.query(Vfo::Main).unwrap(), b"FA01;");
    }
}
