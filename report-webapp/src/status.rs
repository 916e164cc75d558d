//! Status log shown under the report form
//!
//! Append-only from the caller's point of view: newest entry first, capped at
//! [`STATUS_LOG_CAPACITY`] entries. Every entry is mirrored to `tracing`.

use crate::types::LogLevel;
use crate::ui::LogSurface;
use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::collections::VecDeque;
use tracing::{error, info, warn};

pub const STATUS_LOG_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub at: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl StatusEntry {
    /// `[HH:MM:SS] LEVEL: message`
    pub fn render(&self) -> String {
        format!("[{}] {}: {}", self.at.format("%H:%M:%S"), self.level, self.message)
    }
}

/// Bounded, newest-first message list
#[derive(Debug, Clone)]
pub struct StatusLog {
    entries: VecDeque<StatusEntry>,
    capacity: usize,
}

impl Default for StatusLog {
    fn default() -> Self {
        Self::with_capacity(STATUS_LOG_CAPACITY)
    }
}

impl StatusLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, entry: StatusEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&StatusEntry> {
        self.entries.front()
    }
}

/// Writes status messages to the visible log, or to tracing when there is none
pub struct StatusReporter {
    log: RefCell<StatusLog>,
    surface: Option<Box<dyn LogSurface>>,
    tag: Option<String>,
}

impl StatusReporter {
    pub fn new(surface: Option<Box<dyn LogSurface>>) -> Self {
        Self {
            log: RefCell::new(StatusLog::default()),
            surface,
            tag: None,
        }
    }

    /// Prefix every message with `[Script <version>]`
    pub fn with_script_version(mut self, version: Option<&str>) -> Self {
        self.tag = version.map(|v| format!("[Script {}]", v));
        self
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.report(message, LogLevel::Info);
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.report(message, LogLevel::Success);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.report(message, LogLevel::Error);
    }

    pub fn report(&self, message: impl AsRef<str>, level: LogLevel) {
        let message = match &self.tag {
            Some(tag) => format!("{} {}", tag, message.as_ref()),
            None => message.as_ref().to_string(),
        };

        match level {
            LogLevel::Error => error!(target: "report_webapp::status", "{}", message),
            _ => info!(target: "report_webapp::status", kind = level.as_str(), "{}", message),
        }

        let entry = StatusEntry {
            at: Local::now(),
            level,
            message,
        };

        let mut log = self.log.borrow_mut();
        log.push(entry);

        match &self.surface {
            Some(surface) => {
                let snapshot: Vec<StatusEntry> = log.entries().cloned().collect();
                surface.render(&snapshot);
            }
            None => {
                if let Some(latest) = log.latest() {
                    warn!("message area not found for message: {}", latest.message);
                }
            }
        }
    }

    pub fn snapshot(&self) -> Vec<StatusEntry> {
        self.log.borrow().entries().cloned().collect()
    }

    pub fn latest(&self) -> Option<StatusEntry> {
        self.log.borrow().latest().cloned()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }
}
