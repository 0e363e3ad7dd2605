//! Per-session state carried between `execute` calls.
//!
//! The shell itself keeps nothing between calls. Whatever has to survive to
//! the next line lives here, and the host is responsible for passing the
//! context it got back in the last `Response` into the next call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::options::Options;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Set while the next input line answers an option prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<PendingPrompt>,
    /// Command prefix retried when a typed command does not resolve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passive: Option<PassiveContext>,
    /// Host-owned payload. The shell never interprets it.
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// A suspended option collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPrompt {
    /// Option key the answer will be stored under.
    pub option: String,
    /// Command to resume.
    pub cmd: String,
    /// Options gathered so far; the answer is added to these.
    pub options: Options,
    /// Context to restore if the prompt is canceled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_context: Option<Box<SessionContext>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassiveContext {
    pub cmd_str: String,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_prompt(&self) -> bool {
        self.prompt.is_some()
    }

    pub fn clear_prompt(&mut self) -> Option<PendingPrompt> {
        self.prompt.take()
    }

    pub fn set_passive(&mut self, cmd_str: impl Into<String>) {
        self.passive = Some(PassiveContext {
            cmd_str: cmd_str.into(),
        });
    }

    pub fn clear_passive(&mut self) -> Option<PassiveContext> {
        self.passive.take()
    }

    /// The passive prefix, if one is set and non-blank.
    pub fn passive_prefix(&self) -> Option<&str> {
        self.passive
            .as_ref()
            .map(|p| p.cmd_str.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn get_data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }
}

impl PendingPrompt {
    pub fn new(option: impl Into<String>, cmd: impl Into<String>, options: Options) -> Self {
        Self {
            option: option.into(),
            cmd: cmd.into(),
            options,
            previous_context: None,
        }
    }

    pub fn with_previous_context(mut self, context: SessionContext) -> Self {
        self.previous_context = Some(Box::new(context));
        self
    }
}
