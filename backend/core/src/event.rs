//! Completion events raised once per `execute` call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tracing::debug;

use crate::options::Options;

/// Default number of events buffered for slow subscribers.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShellEvent {
    /// The call has finished. `prompt_pending` tells the host the next line
    /// answers a prompt.
    #[serde(rename_all = "camelCase")]
    Done { prompt_pending: bool },
    /// Raised after `Done` when no prompt is left pending.
    #[serde(rename_all = "camelCase")]
    CommandComplete {
        /// Resolved command name; `None` when no command was resolved.
        command: Option<String>,
        data: Map<String, Value>,
        options: Options,
        /// Option keys whose values must not be logged in clear.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        sensitive: Vec<String>,
    },
}

impl ShellEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ShellEvent::Done { .. } => "done",
            ShellEvent::CommandComplete { .. } => "commandComplete",
        }
    }
}

/// Fan-out of shell events to any number of host subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ShellEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish to current subscribers. Having none is not an error.
    pub fn publish(&self, event: ShellEvent) {
        debug!(event = event.name(), "[Shell] Publishing event");
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
