//! Background polling loop.
//!
//! A dedicated thread keeps the display state fresh: (re)open the serial
//! port with capped exponential backoff, run one poll cycle, sleep, and
//! keep going until the process exits. Transport failures are published
//! into the display state and followed by a longer pause; nothing here is
//! ever fatal.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::service::RadioService;

/// Pause between successful poll cycles; bounds serial contention while
/// keeping UI latency low.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Longer pause after a transport failure, before the reopen attempt.
const ERROR_INTERVAL: Duration = Duration::from_millis(500);

/// First retry delay after a failed open.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Open retry delays double up to this ceiling; retries never stop.
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Spawn the poller thread. It runs for the life of the process; the
/// handle is only useful for naming the thread in diagnostics.
pub fn spawn(service: Arc<RadioService>) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("cat-poller".to_string())
        .spawn(move || run(&service))
        .expect("spawn cat-poller thread")
}

fn run(service: &RadioService) {
    let mut backoff = INITIAL_BACKOFF;
    loop {
        if !service.transport_open() {
            match service.open_transport() {
                Ok(()) => {
                    log::info!("serial port opened");
                    backoff = INITIAL_BACKOFF;
                }
                Err(e) => {
                    log::warn!("serial open failed, retrying in {backoff:?}: {e}");
                    // Backoff sleep happens without the session lock held,
                    // so set-frequency requests fail fast instead of queuing
                    thread::sleep(backoff);
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                    continue;
                }
            }
        }

        match service.poll_cycle() {
            Ok(()) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                log::warn!("poll cycle failed: {e}");
                service.record_transport_error(&e);
                thread::sleep(ERROR_INTERVAL);
            }
        }
    }
}
