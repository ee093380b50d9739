//! Shared fakes for the integration tests.

#![allow(dead_code)]

use std::io;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

use audit_log_core::emitter::{LogEntry, LogHandler};
use audit_log_core::error::AuditError;
use audit_log_core::request::{InboundRequest, OutboundResponse};
use tracing_subscriber::fmt::MakeWriter;

/// An in-memory request.
#[derive(Debug, Clone)]
pub struct FakeRequest {
    pub method: String,
    pub url: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub remote_addr: Option<IpAddr>,
    pub broken_headers: bool,
}

impl FakeRequest {
    pub fn new(method: &str, url: &str) -> Self {
        let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
        let path_and_query = after_scheme
            .find('/')
            .map_or("/", |i| &after_scheme[i..]);
        let path = path_and_query.split('?').next().unwrap_or("/");

        Self {
            method: method.to_string(),
            url: url.to_string(),
            path: path.to_string(),
            headers: Vec::new(),
            remote_addr: None,
            broken_headers: false,
        }
    }

    pub fn get(url: &str) -> Self {
        Self::new("GET", url)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn remote(mut self, addr: &str) -> Self {
        self.remote_addr = Some(addr.parse().expect("valid ip"));
        self
    }

    /// Every header read fails, as with a malformed header block.
    pub fn broken(mut self) -> Self {
        self.broken_headers = true;
        self
    }
}

impl InboundRequest for FakeRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn header(&self, name: &str) -> Option<String> {
        if self.broken_headers {
            return None;
        }
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }

    fn header_values(&self, name: &str) -> Result<Vec<String>, AuditError> {
        if self.broken_headers {
            return Err(AuditError::InvalidHeader {
                name: name.to_string(),
                reason: "malformed header block".to_string(),
            });
        }
        Ok(self
            .headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn remote_addr(&self) -> Option<IpAddr> {
        self.remote_addr
    }
}

/// An in-memory response.
#[derive(Debug, Clone, Default)]
pub struct FakeResponse {
    pub status_code: Option<u16>,
    pub reason: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl FakeResponse {
    pub fn new(status_code: u16, reason: &str) -> Self {
        Self {
            status_code: Some(status_code),
            reason: Some(reason.to_string()),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

impl OutboundResponse for FakeResponse {
    fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    fn reason(&self) -> Option<String> {
        self.reason.clone()
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.headers.clone()
    }
}

/// A handler that keeps every message it is given.
#[derive(Debug, Clone, Default)]
pub struct CaptureHandler {
    pub lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureHandler {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogHandler for CaptureHandler {
    fn handle(&self, entry: &LogEntry<'_>) -> Result<(), AuditError> {
        self.lines.lock().unwrap().push(entry.message.to_string());
        Ok(())
    }
}

/// A handler whose sink is always down.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingHandler;

impl LogHandler for FailingHandler {
    fn handle(&self, _entry: &LogEntry<'_>) -> Result<(), AuditError> {
        Err(AuditError::Emission("sink unavailable".to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber that records formatted log lines.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (result, logs)
}
