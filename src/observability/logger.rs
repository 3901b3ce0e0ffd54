//! Structured JSON logger
//!
//! - One log line = one event
//! - Event first, then severity, then fields sorted by key
//! - Synchronous, no buffering
//! - Events below the process-wide minimum severity are dropped

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Per-row detail
    Trace = 0,
    /// Table lifecycle
    Info = 1,
    /// Rejected rows and documents
    Warn = 2,
    /// Store failures
    Error = 3,
    /// Unrecoverable
    Fatal = 4,
}

impl Severity {
    const ALL: [Severity; 5] = [
        Severity::Trace,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    fn from_u8(value: u8) -> Self {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .unwrap_or(Severity::Fatal)
    }

    /// ERROR and FATAL go to stderr
    fn is_failure(&self) -> bool {
        *self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Warn as u8);

/// One rendered event.
///
/// Fields are kept in a sorted map so identical events render identically
/// whatever order the caller listed them in. A repeated key keeps the last
/// value.
struct LogLine<'a> {
    event: &'a str,
    severity: Severity,
    fields: BTreeMap<&'a str, &'a str>,
}

impl<'a> LogLine<'a> {
    fn new(severity: Severity, event: &'a str, fields: &[(&'a str, &'a str)]) -> Self {
        Self {
            event,
            severity,
            fields: fields.iter().copied().collect(),
        }
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(64 + self.fields.len() * 32);
        out.push_str("{\"event\":");
        push_json_str(&mut out, self.event);
        out.push_str(",\"severity\":");
        push_json_str(&mut out, self.severity.as_str());
        for (key, value) in &self.fields {
            out.push(',');
            push_json_str(&mut out, key);
            out.push(':');
            push_json_str(&mut out, value);
        }
        out.push_str("}\n");
        out
    }
}

/// Appends `s` as a quoted JSON string
fn push_json_str(out: &mut String, s: &str) {
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        // unreachable for &str
        Err(_) => out.push_str("\"\""),
    }
}

/// A structured logger that outputs JSON logs
pub struct Logger;

impl Logger {
    /// Sets the process-wide minimum severity
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    pub fn min_severity() -> Severity {
        Severity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// Whether an event at `severity` would be written.
    ///
    /// Callers building field strings for hot-path events check this first.
    pub fn is_enabled(severity: Severity) -> bool {
        severity >= Self::min_severity()
    }

    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !Self::is_enabled(severity) {
            return;
        }
        let line = LogLine::new(severity, event, fields);
        if severity.is_failure() {
            Self::write_line(&line, &mut io::stderr().lock());
        } else {
            Self::write_line(&line, &mut io::stdout().lock());
        }
    }

    fn write_line<W: Write>(line: &LogLine<'_>, writer: &mut W) {
        // A lost log line never fails the row operation that produced it
        let _ = writer.write_all(line.render().as_bytes());
        let _ = writer.flush();
    }

    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    pub fn fatal(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Fatal, event, fields);
    }
}
