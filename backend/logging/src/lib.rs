//! Structured logging for cmdshell hosts.
//!
//! Handles subscriber setup, log redaction, and structured shell-event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger};
pub use logger::init_logger;
pub use redact::{redact_options, redact_sensitive_data, REDACTED};
