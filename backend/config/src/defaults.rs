//! Config defaults: fills unset fields of a freshly loaded config.

use crate::schema::{LoggingSection, ShellConfig, ShellSection};

pub const DEFAULT_CANCEL_KEYWORD: &str = "cancel";

pub const DEFAULT_HELP_FLAGS: &[&str] = &["?", "help"];

/// One passive retry per call.
pub const DEFAULT_MAX_PASSIVE_DEPTH: u32 = 1;

pub const DEFAULT_PROMPT_TEMPLATE: &str = "Enter value for {key}.";

pub const DEFAULT_EVENT_CAPACITY: usize = 64;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: ShellConfig) -> ShellConfig {
    let config = apply_shell_defaults(config);
    apply_logging_defaults(config)
}

fn apply_shell_defaults(mut config: ShellConfig) -> ShellConfig {
    let shell = config.shell.get_or_insert_with(ShellSection::default);
    shell
        .cancel_keyword
        .get_or_insert_with(|| DEFAULT_CANCEL_KEYWORD.to_string());
    shell
        .help_flags
        .get_or_insert_with(|| DEFAULT_HELP_FLAGS.iter().map(|f| f.to_string()).collect());
    shell.max_passive_depth.get_or_insert(DEFAULT_MAX_PASSIVE_DEPTH);
    shell
        .prompt_template
        .get_or_insert_with(|| DEFAULT_PROMPT_TEMPLATE.to_string());
    shell.event_capacity.get_or_insert(DEFAULT_EVENT_CAPACITY);
    config
}

fn apply_logging_defaults(mut config: ShellConfig) -> ShellConfig {
    let logging = config.logging.get_or_insert_with(LoggingSection::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}
