pub mod engine;
pub mod flags;
pub mod handlers;
pub mod parser;
pub mod registry;
pub mod resolver;
pub mod scope;
pub mod types;

pub use engine::{Shell, ShellSettings};
pub use flags::{parse_flags, FlagTypes};
pub use handlers::builtin_commands;
pub use parser::{is_invalid_input, parse, ParsedLine};
pub use registry::CommandRegistry;
pub use resolver::{OptionResolver, Resolution, DEFAULT_PROMPT_TEMPLATE};
pub use scope::{CommandScope, Completion};
pub use types::{
    CommandDefinition, Invocation, OptionKind, OptionSpec, PromptSpec, Validator, Verdict,
};

pub use cmdshell_core::{
    LogEntry, LogLevel, Options, PassiveContext, PendingPrompt, Response, SessionContext,
    ShellError, ShellEvent,
};
