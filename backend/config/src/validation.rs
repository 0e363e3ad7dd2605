//! Config validation: field checks with user-friendly error messages.

use crate::schema::ShellConfig;
use thiserror::Error;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// Every error and warning found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &ShellConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_shell(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_shell(config: &ShellConfig, report: &mut ValidationReport) {
    if config.cancel_keyword().trim().is_empty() {
        report.error("shell.cancelKeyword", "Cancel keyword cannot be empty");
    }
    let flags = config.help_flags();
    if flags.is_empty() {
        report.warn("shell.helpFlags", "No help flags configured; --help will reach commands");
    }
    if flags.iter().any(|f| f.trim().is_empty()) {
        report.error("shell.helpFlags", "Help flags cannot be empty strings");
    }
    if config.event_capacity() == 0 {
        report.error("shell.eventCapacity", "Event capacity must be at least 1");
    }
    if !config.prompt_template().contains("{key}") {
        report.warn(
            "shell.promptTemplate",
            "Template has no {key} placeholder; every generated prompt will read the same",
        );
    }
    if config.max_passive_depth() > 8 {
        report.warn("shell.maxPassiveDepth", "Deep passive chains are rarely intended");
    }
}

fn validate_logging(config: &ShellConfig, report: &mut ValidationReport) {
    let level = config.log_level().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        report.error(
            "logging.level",
            format!("Unknown log level '{level}'; expected one of {}", LOG_LEVELS.join(", ")),
        );
    }
}
