//! Usage event log.
//!
//! One line per event, `<YYYY/MM/DD HH:MM:SS>\t<chat>:\t<message>`, where
//! `<chat>` is the chat id or `bot`. The offline analyzer reads this format.

use chrono::{DateTime, Local};
use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::warn;

/// Timestamp layout of every event line
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Chat field used for events not tied to a chat
pub const BOT_SOURCE: &str = "bot";

/// Message prefix of a city list delivery event
pub const LIST_EVENT_PREFIX: &str = "got list for ";

/// Message prefix of an ad delivery event
pub const AD_EVENT_PREFIX: &str = "got ad ";

/// Append-only, line-flushed event sink
pub struct EventLog {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog").finish_non_exhaustive()
    }
}

impl EventLog {
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Mutex::new(Box::new(sink)),
        }
    }

    /// Event log on the process's standard error
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Record an event for a chat, or for the bot itself when `chat` is `None`
    pub fn record(&self, chat: Option<impl Display>, message: &str) {
        let source = match chat {
            Some(chat) => chat.to_string(),
            None => BOT_SOURCE.to_string(),
        };
        let line = format_line(Local::now(), &source, message);

        let mut sink = match self.sink.lock() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(sink, "{line}").and_then(|_| sink.flush()) {
            warn!(error = %e, "Failed to write event log line");
        }
    }

    pub fn bot(&self, message: &str) {
        self.record(None::<&str>, message);
    }

    pub fn list_delivered(&self, chat: impl Display, city: &str) {
        self.record(Some(chat), &format!("{LIST_EVENT_PREFIX}{city}"));
    }

    pub fn ad_delivered(&self, chat: impl Display, ad: &str) {
        self.record(Some(chat), &format!("{AD_EVENT_PREFIX}{ad}"));
    }
}

/// Render a single event line without the trailing newline.
///
/// Line breaks and tabs in the fields are escaped so one event stays one line.
pub fn format_line(at: DateTime<Local>, source: &str, message: &str) -> String {
    format!(
        "{}\t{}:\t{}",
        at.format(TIMESTAMP_FORMAT),
        escape_field(source),
        escape_field(message)
    )
}

/// Escape control characters, leaving every other character as typed
pub fn escape_field(field: &str) -> String {
    let mut escaped = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\\' => escaped.push_str("\\\\"),
            c if c.is_control() => escaped.extend(c.escape_default()),
            c => escaped.push(c),
        }
    }
    escaped
}
