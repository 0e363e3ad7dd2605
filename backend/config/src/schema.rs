//! cmdshell configuration schema.
//!
//! Every field is optional on disk; `defaults::apply_all_defaults` fills the
//! gaps and the accessors below read the filled values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults::{
    DEFAULT_CANCEL_KEYWORD, DEFAULT_EVENT_CAPACITY, DEFAULT_HELP_FLAGS, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_PASSIVE_DEPTH, DEFAULT_PROMPT_TEMPLATE,
};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellConfig {
    /// Command engine behavior
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<ShellSection>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_flags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_passive_depth: Option<u32>,
    /// Generated prompt text; `{key}` is replaced by the option key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_capacity: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling NDJSON logs; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

impl ShellConfig {
    fn shell_section(&self) -> Option<&ShellSection> {
        self.shell.as_ref()
    }

    fn logging_section(&self) -> Option<&LoggingSection> {
        self.logging.as_ref()
    }

    pub fn cancel_keyword(&self) -> &str {
        self.shell_section()
            .and_then(|s| s.cancel_keyword.as_deref())
            .unwrap_or(DEFAULT_CANCEL_KEYWORD)
    }

    pub fn help_flags(&self) -> Vec<String> {
        self.shell_section()
            .and_then(|s| s.help_flags.clone())
            .unwrap_or_else(|| DEFAULT_HELP_FLAGS.iter().map(|f| f.to_string()).collect())
    }

    pub fn max_passive_depth(&self) -> u32 {
        self.shell_section()
            .and_then(|s| s.max_passive_depth)
            .unwrap_or(DEFAULT_MAX_PASSIVE_DEPTH)
    }

    pub fn prompt_template(&self) -> &str {
        self.shell_section()
            .and_then(|s| s.prompt_template.as_deref())
            .unwrap_or(DEFAULT_PROMPT_TEMPLATE)
    }

    pub fn event_capacity(&self) -> usize {
        self.shell_section()
            .and_then(|s| s.event_capacity)
            .unwrap_or(DEFAULT_EVENT_CAPACITY)
    }

    pub fn log_level(&self) -> &str {
        self.logging_section()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&PathBuf> {
        self.logging_section().and_then(|l| l.dir.as_ref())
    }

    pub fn log_json(&self) -> bool {
        self.logging_section().and_then(|l| l.json).unwrap_or(false)
    }
}
