use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ShellError;
use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    #[serde(rename = "type")]
    pub level: LogLevel,
}

/// Everything one `execute` call hands back to the host.
///
/// Built fresh per call from a copy of the incoming context; the host must
/// thread `context` into the next call for prompts and passive mode to work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub log: Vec<LogEntry>,
    pub context: SessionContext,
    /// The pending prompt wants masked input.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub password: bool,
}

impl Response {
    pub fn new(context: SessionContext) -> Self {
        Self {
            log: Vec::new(),
            context,
            password: false,
        }
    }

    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        debug!(?level, "[Response] {}", message);
        self.log.push(LogEntry { message, level });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message);
    }

    /// Record a shell error as an `error` entry.
    pub fn report(&mut self, err: &ShellError) {
        self.error(err.to_string());
    }

    pub fn has_errors(&self) -> bool {
        self.log.iter().any(|e| e.level == LogLevel::Error)
    }

    /// Messages of one level, in order.
    pub fn messages(&self, level: LogLevel) -> Vec<&str> {
        self.log
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.as_str())
            .collect()
    }
}
