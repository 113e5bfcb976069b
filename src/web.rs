//! HTTP façade: thin glue between browsers and the RadioService.
//!
//! Deliberately small thread-per-connection HTTP/1.1 loop over
//! `std::net::TcpListener` — the façade serves one page, a JSON snapshot,
//! an SSE stream, and the set-frequency endpoint, and every one of them
//! goes through the service interface. All responses close the
//! connection, which is also what terminates the SSE body.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::CatError;
use crate::service::RadioService;
use crate::state::FrequencySnapshot;

/// How often the SSE loop re-reads the snapshot looking for changes.
const STREAM_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Largest accepted request body; set_freq payloads are tiny.
const MAX_BODY_BYTES: u64 = 4096;

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head>
  <title>Yaesu CAT Control</title>
  <style>
    #freq-box, #freq-box-b {
      width: 300px; height: 100px;
      border: 2px solid #333;
      font-size: 28px;
      font-weight: bold;
      text-align: center;
      line-height: 100px;
      margin: 20px auto;
      background-color: #f0f0f0;
    }
  </style>
</head>
<body>
  <h1>Yaesu CAT Web Control Active</h1>
  <div id="freq-box">Loading A...</div>
  <div id="freq-box-b">Loading B...</div>
  <script>
    const boxA = document.getElementById('freq-box');
    const boxB = document.getElementById('freq-box-b');
    if (!!window.EventSource) {
      const es = new EventSource('/stream');
      es.onmessage = e => {
        try {
          const parsed = JSON.parse(e.data);
          boxA.innerText = parsed.frequency;
          boxB.innerText = parsed.frequency_b;
        } catch (err) {
          boxA.innerText = 'Error';
          boxB.innerText = 'Error';
        }
      };
      es.onerror = e => { boxA.innerText = 'Error'; boxB.innerText = 'Error'; console.error(e); };
    } else {
      async function update() {
        try {
          let r = await fetch('/freq', {cache: "no-store"});
          let j = await r.json();
          boxA.innerText = j.frequency;
          boxB.innerText = j.frequency_b;
        } catch (e) {
          boxA.innerText = "Error";
          boxB.innerText = "Error";
        }
      }
      setInterval(update, 200);
      update();
    }
  </script>
</body>
</html>
"#;

/// Body of `POST /set_freq`.
#[derive(Debug, Deserialize)]
struct SetFrequencyRequest {
    vfo: String,
    hz: i64,
}

/// A parsed inbound request: just enough HTTP for the four routes.
#[derive(Debug)]
struct Request {
    method: String,
    path: String,
    body: Vec<u8>,
}

pub struct WebServer {
    listener: TcpListener,
    service: Arc<RadioService>,
}

impl WebServer {
    pub fn bind(addr: &str, service: Arc<RadioService>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(Self { listener, service })
    }

    /// The actually bound address (useful with a ":0" ephemeral port).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop; runs until the process exits. Each connection gets its
    /// own thread so a long-lived SSE stream never blocks other clients.
    pub fn run(self) -> io::Result<()> {
        log::info!("http façade listening on {}", self.listener.local_addr()?);
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let service = Arc::clone(&self.service);
                    thread::spawn(move || {
                        if let Err(e) = handle_connection(stream, &service) {
                            log::debug!("connection ended: {e}");
                        }
                    });
                }
                Err(e) => log::warn!("accept failed: {e}"),
            }
        }
        Ok(())
    }
}

fn handle_connection(mut stream: TcpStream, service: &RadioService) -> io::Result<()> {
    let request = {
        let mut reader = BufReader::new(&mut stream);
        read_request(&mut reader)?
    };

    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/") => respond(&mut stream, 200, "text/html; charset=utf-8", INDEX_HTML),
        ("GET", "/freq") => {
            let json = snapshot_json(&service.snapshot());
            respond(&mut stream, 200, "application/json", &json)
        }
        ("GET", "/stream") => stream_events(stream, service),
        ("POST", "/set_freq") => handle_set_freq(&mut stream, service, &request.body),
        _ => respond(
            &mut stream,
            404,
            "application/json",
            r#"{"error":"not found"}"#,
        ),
    }
}

fn handle_set_freq(
    stream: &mut TcpStream,
    service: &RadioService,
    body: &[u8],
) -> io::Result<()> {
    let parsed: SetFrequencyRequest = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            let msg = error_json(&format!("bad request body: {e}"));
            return respond(stream, 400, "application/json", &msg);
        }
    };

    match service.set_frequency(&parsed.vfo, parsed.hz) {
        Ok(()) => respond(stream, 200, "application/json", r#"{"status":"ok"}"#),
        Err(e) => {
            let status = match e {
                CatError::UnknownChannel(_) | CatError::InvalidFrequency(_) => 400,
                CatError::Serial(_) => 503,
                _ => 500,
            };
            let msg = error_json(&e.to_string());
            respond(stream, status, "application/json", &msg)
        }
    }
}

/// Server-sent events: push the snapshot whenever it differs from the last
/// one sent, checking every few tens of milliseconds. Ends when the client
/// hangs up (the write fails).
fn stream_events(mut stream: TcpStream, service: &RadioService) -> io::Result<()> {
    stream.write_all(
        b"HTTP/1.1 200 OK\r\n\
          Content-Type: text/event-stream\r\n\
          Cache-Control: no-cache\r\n\
          Connection: close\r\n\r\n",
    )?;

    let mut last_sent: Option<FrequencySnapshot> = None;
    loop {
        let snapshot = service.snapshot();
        if last_sent.as_ref() != Some(&snapshot) {
            let event = format!("data: {}\n\n", snapshot_json(&snapshot));
            stream.write_all(event.as_bytes())?;
            stream.flush()?;
            last_sent = Some(snapshot);
        }
        thread::sleep(STREAM_POLL_INTERVAL);
    }
}

/// Parse the request line, headers, and (given Content-Length) the body.
fn read_request(reader: &mut impl BufRead) -> io::Result<Request> {
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "empty request line"))?
        .to_string();
    let raw_path = parts
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "request line has no path"))?;
    // Route matching ignores any query string
    let path = raw_path
        .split('?')
        .next()
        .unwrap_or(raw_path)
        .to_string();

    let mut content_length: u64 = 0;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some(value) = line
            .to_ascii_lowercase()
            .strip_prefix("content-length:")
            .map(str::trim)
            .map(str::to_string)
        {
            content_length = value.parse().map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidData, "bad content-length")
            })?;
        }
    }

    let mut body = Vec::new();
    if content_length > 0 {
        reader
            .take(content_length.min(MAX_BODY_BYTES))
            .read_to_end(&mut body)?;
    }

    Ok(Request { method, path, body })
}

fn respond(
    stream: &mut TcpStream,
    status: u16,
    content_type: &str,
    body: &str,
) -> io::Result<()> {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        503 => "Service Unavailable",
        _ => "Internal Server Error",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\n\
         Content-Type: {content_type}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes())?;
    stream.flush()
}

fn snapshot_json(snapshot: &FrequencySnapshot) -> String {
    // FrequencySnapshot serialization cannot fail: two string fields
    serde_json::to_string(snapshot).unwrap_or_else(|_| r#"{"error":"internal"}"#.to_string())
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
