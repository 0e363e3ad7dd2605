//! Shell Event Logger
//!
//! `done` / `commandComplete` events written as structured records.

use chrono::{DateTime, Utc};
use cmdshell_core::ShellEvent;
use serde::Serialize;
use tracing::info;

use crate::redact::{redact_options, redact_sensitive_data};

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: ShellEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Build the redacted record for `event`.
    pub fn entry(session_id: &str, event: &ShellEvent) -> EventLogEntry {
        let event = match event {
            ShellEvent::CommandComplete {
                command,
                data,
                options,
                sensitive,
            } => ShellEvent::CommandComplete {
                command: command.clone(),
                data: data.clone(),
                options: redact_options(options, sensitive),
                sensitive: sensitive.clone(),
            },
            other => other.clone(),
        };
        EventLogEntry {
            session_id: session_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }

    /// Log a shell event with password options masked and secret-looking
    /// text scrubbed.
    pub fn log_event(session_id: &str, event: &ShellEvent) {
        let entry = Self::entry(session_id, event);
        let record = redact_sensitive_data(&serde_json::to_string(&entry).unwrap_or_default());
        info!(target: "shell_events", session = %session_id, kind = entry.event.name(), %record, "Shell event");
    }
}
