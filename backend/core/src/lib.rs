pub mod error;
pub mod event;
pub mod options;
pub mod response;
pub mod session;

pub use error::ShellError;
pub use event::{EventBus, ShellEvent, DEFAULT_EVENT_CAPACITY};
pub use options::{value_to_string, Options};
pub use response::{LogEntry, LogLevel, Response};
pub use session::{PassiveContext, PendingPrompt, SessionContext};
