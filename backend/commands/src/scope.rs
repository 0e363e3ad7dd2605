/// The handle a running command uses to talk back to the shell.
///
/// A `CommandScope` owns the in-flight `Response` for the duration of one
/// invocation. It is cheap to clone so asynchronous commands can move it into
/// a spawned task; anything written after the command has signalled
/// completion is discarded.
use std::sync::Arc;

use anyhow::Error;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use cmdshell_core::{LogLevel, PendingPrompt, Response, SessionContext};

use crate::registry::CommandRegistry;

#[derive(Clone)]
pub struct CommandScope {
    command: Arc<str>,
    response: Arc<Mutex<Response>>,
    registry: Arc<CommandRegistry>,
}

impl CommandScope {
    pub(crate) fn new(command: &str, response: Response, registry: Arc<CommandRegistry>) -> Self {
        Self {
            command: Arc::from(command),
            response: Arc::new(Mutex::new(response)),
            registry,
        }
    }

    /// Name of the command being run.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.response.lock().push(level, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Snapshot of the session context as it stands now.
    pub fn context(&self) -> SessionContext {
        self.response.lock().context.clone()
    }

    pub fn update_context<R>(&self, f: impl FnOnce(&mut SessionContext) -> R) -> R {
        f(&mut self.response.lock().context)
    }

    pub fn data(&self, key: &str) -> Option<Value> {
        self.response.lock().context.get_data(key).cloned()
    }

    pub fn set_data(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.response.lock().context.set_data(key, value);
    }

    pub fn set_passive(&self, cmd_str: impl Into<String>) {
        self.response.lock().context.set_passive(cmd_str);
    }

    pub fn clear_passive(&self) {
        self.response.lock().context.clear_passive();
    }

    /// Suspend on a question; the next input line answers `prompt.option`.
    pub fn set_prompt(&self, prompt: PendingPrompt, message: impl Into<String>, password: bool) {
        let mut res = self.response.lock();
        debug!(command = %self.command, option = %prompt.option, "[Shell] Command set a prompt");
        res.context.prompt = Some(prompt);
        res.password = password;
        res.info(message);
    }

    pub(crate) fn take_response(&self) -> Response {
        std::mem::take(&mut *self.response.lock())
    }
}

/// One-shot completion signal handed to asynchronous commands.
///
/// Consumed by `done`, `fail` or `finish`, so it can fire at most once.
/// Dropping it without firing is reported as a command fault.
#[derive(Debug)]
pub struct Completion {
    command: Arc<str>,
    tx: oneshot::Sender<Result<(), Error>>,
}

impl Completion {
    pub fn done(self) {
        self.finish(Ok(()));
    }

    pub fn fail(self, err: impl Into<Error>) {
        self.finish(Err(err.into()));
    }

    pub fn finish(self, result: Result<(), Error>) {
        if self.tx.send(result).is_err() {
            warn!(command = %self.command, "[Shell] Completion fired after the shell stopped waiting");
        }
    }
}

pub(crate) fn completion(command: &str) -> (Completion, oneshot::Receiver<Result<(), Error>>) {
    let (tx, rx) = oneshot::channel();
    let completion = Completion {
        command: Arc::from(command),
        tx,
    };
    (completion, rx)
}
