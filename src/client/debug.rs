//! Wire-level request/response dump
//!
//! Independent of `log`: lines go straight to the configured writer,
//! prefixed `[c] ` for what the client sent and `[s] ` for what the server
//! answered.

use std::borrow::Cow;
use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

use reqwest::header::{AUTHORIZATION, HeaderMap};
use serde::Deserialize;

use super::transport::{WireRequest, WireResponse};

/// How much of each exchange the dump shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum DebugLevel {
    /// Request line and response status line only
    #[default]
    RequestLine,
    /// Headers and bodies as well
    Full,
}

impl TryFrom<u8> for DebugLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DebugLevel::RequestLine),
            1 => Ok(DebugLevel::Full),
            other => Err(format!("debug_level must be 0 or 1, got {other}")),
        }
    }
}

/// Shared writer receiving the dump
#[derive(Clone)]
pub struct DebugSink {
    level: DebugLevel,
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl DebugSink {
    pub fn new<W: Write + Send + 'static>(level: DebugLevel, writer: W) -> Self {
        Self {
            level,
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout(level: DebugLevel) -> Self {
        Self::new(level, std::io::stdout())
    }

    pub fn level(&self) -> DebugLevel {
        self.level
    }

    pub(crate) fn dump_request(&self, request: &WireRequest<'_>) {
        let mut text = format!(
            "{} {} HTTP/1.1",
            request.method,
            request_target(&request.url)
        );

        if self.level == DebugLevel::Full {
            if let Some(host) = request.url.host_str() {
                text.push_str(&format!("\nHost: {host}"));
            }
            push_headers(&mut text, &request.headers);
            text.push('\n');
            if let Some(body) = request.body {
                text.push('\n');
                text.push_str(&String::from_utf8_lossy(body));
            }
        }

        self.write_lines("c", &text);
    }

    pub(crate) fn dump_response(&self, response: &WireResponse) {
        let mut text = format!("HTTP/1.1 {}", response.status);

        if self.level == DebugLevel::Full {
            push_headers(&mut text, &response.headers);
            text.push('\n');
            if !response.body.is_empty() {
                text.push('\n');
                text.push_str(&String::from_utf8_lossy(&response.body));
            }
        }

        self.write_lines("s", &text);
    }

    fn write_lines(&self, prefix: &str, text: &str) {
        // A poisoned writer only loses diagnostics.
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        for line in text.lines() {
            let _ = writeln!(writer, "[{prefix}] {line}");
        }
        let _ = writer.flush();
    }
}

impl fmt::Debug for DebugSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugSink")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

fn request_target(url: &reqwest::Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

fn push_headers(text: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        let value = if name == AUTHORIZATION {
            Cow::Borrowed("Bearer [redacted]")
        } else {
            String::from_utf8_lossy(value.as_bytes())
        };
        text.push_str(&format!("\n{}: {}", canonical_name(name.as_str()), value));
    }
}

/// `content-type` -> `Content-Type`
fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
