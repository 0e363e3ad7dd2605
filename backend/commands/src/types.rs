/// Command and option declarations.
///
/// A host builds `CommandDefinition` values and registers them; the shell
/// reads the option specs to parse, resolve and validate arguments.
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use regex::Regex;
use serde_json::Value;

use cmdshell_core::{value_to_string, Options, SessionContext};

use crate::flags::FlagTypes;
use crate::scope::{CommandScope, Completion};

// ---------------------------------------------------------------------------
// Option spec
// ---------------------------------------------------------------------------

/// How the flag parser should read an option's raw tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Boolean,
}

/// Whether a missing option suspends the command to ask for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PromptSpec {
    #[default]
    Off,
    /// Ask with a message generated from the option key.
    Generated,
    /// Ask with this message.
    Message(String),
}

impl PromptSpec {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, PromptSpec::Off)
    }
}

pub type Predicate = Arc<dyn Fn(&Value) -> Result<bool> + Send + Sync>;

/// Outcome of running a validator over one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid,
    /// The predicate itself failed; treated as invalid.
    Faulted(String),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

#[derive(Clone)]
pub enum Validator {
    /// Tested against the value rendered as text.
    Pattern(Regex),
    Predicate(Predicate),
}

impl Validator {
    pub fn check(&self, value: &Value) -> Verdict {
        match self {
            Validator::Pattern(re) => {
                if re.is_match(&value_to_string(value)) {
                    Verdict::Valid
                } else {
                    Verdict::Invalid
                }
            }
            Validator::Predicate(f) => match f(value) {
                Ok(true) => Verdict::Valid,
                Ok(false) => Verdict::Invalid,
                Err(e) => Verdict::Faulted(e.to_string()),
            },
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Validator::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Declarative description of one command option.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub key: String,
    pub kind: Option<OptionKind>,
    pub aliases: Vec<String>,
    pub default: Option<Value>,
    pub required: bool,
    /// May be filled from leftover unnamed arguments.
    pub no_name: bool,
    pub prompt: PromptSpec,
    /// Prompt answers for this option are sensitive.
    pub password: bool,
    pub validate: Option<Validator>,
    pub description: Option<String>,
}

impl OptionSpec {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: None,
            aliases: Vec::new(),
            default: None,
            required: false,
            no_name: false,
            prompt: PromptSpec::Off,
            password: false,
            validate: None,
            description: None,
        }
    }

    pub fn string(mut self) -> Self {
        self.kind = Some(OptionKind::String);
        self
    }

    pub fn boolean(mut self) -> Self {
        self.kind = Some(OptionKind::Boolean);
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn no_name(mut self) -> Self {
        self.no_name = true;
        self
    }

    /// Prompt with a generated message when the option is missing.
    pub fn prompt(mut self) -> Self {
        self.prompt = PromptSpec::Generated;
        self
    }

    pub fn prompt_with(mut self, message: impl Into<String>) -> Self {
        self.prompt = PromptSpec::Message(message.into());
        self
    }

    pub fn password(mut self) -> Self {
        self.password = true;
        self
    }

    pub fn matches(mut self, pattern: Regex) -> Self {
        self.validate = Some(Validator::Pattern(pattern));
        self
    }

    pub fn validate_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<bool> + Send + Sync + 'static,
    {
        self.validate = Some(Validator::Predicate(Arc::new(f)));
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Command definition
// ---------------------------------------------------------------------------

pub type AccessFn = Arc<dyn Fn(&SessionContext, &str) -> bool + Send + Sync>;
pub type SyncInvoke = Arc<dyn Fn(&CommandScope, &Options) -> Result<()> + Send + Sync>;
pub type AsyncInvoke = Arc<dyn Fn(CommandScope, Options, Completion) -> Result<()> + Send + Sync>;

/// How a command runs, fixed when it is defined.
#[derive(Clone)]
pub enum Invocation {
    /// Runs to completion inside the call.
    Sync(SyncInvoke),
    /// Returns at once; finished when the `Completion` fires.
    Async(AsyncInvoke),
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invocation::Sync(_) => f.write_str("Sync(..)"),
            Invocation::Async(_) => f.write_str("Async(..)"),
        }
    }
}

/// A registered command.
#[derive(Clone)]
pub struct CommandDefinition {
    /// Lowercase unique name.
    pub name: String,
    pub description: String,
    /// Declared options; order is the resolution order.
    pub options: Vec<OptionSpec>,
    pub invocation: Invocation,
    access: AccessFn,
}

impl CommandDefinition {
    pub fn new(name: impl Into<String>, invocation: Invocation) -> Self {
        Self {
            name: name.into().to_lowercase(),
            description: String::new(),
            options: Vec::new(),
            invocation,
            access: Arc::new(|_, _| true),
        }
    }

    pub fn sync<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&CommandScope, &Options) -> Result<()> + Send + Sync + 'static,
    {
        Self::new(name, Invocation::Sync(Arc::new(f)))
    }

    pub fn asynchronous<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(CommandScope, Options, Completion) -> Result<()> + Send + Sync + 'static,
    {
        Self::new(name, Invocation::Async(Arc::new(f)))
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn option(mut self, spec: OptionSpec) -> Self {
        self.options.push(spec);
        self
    }

    /// Gate visibility and execution on a predicate over the session.
    pub fn access<F>(mut self, f: F) -> Self
    where
        F: Fn(&SessionContext, &str) -> bool + Send + Sync + 'static,
    {
        self.access = Arc::new(f);
        self
    }

    pub fn can_access(&self, session: &SessionContext, name: &str) -> bool {
        (self.access)(session, name)
    }

    pub fn is_async(&self) -> bool {
        matches!(self.invocation, Invocation::Async(_))
    }

    pub fn option_spec(&self, key: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.key == key)
    }

    /// Flag types for this command: typed keys and their aliases.
    pub fn flag_types(&self) -> FlagTypes {
        let mut types = FlagTypes::new();
        for spec in &self.options {
            let names = std::iter::once(&spec.key).chain(spec.aliases.iter());
            match spec.kind {
                Some(OptionKind::String) => names.for_each(|n| {
                    types.string(n.clone());
                }),
                Some(OptionKind::Boolean) => names.for_each(|n| {
                    types.boolean(n.clone());
                }),
                None => {}
            }
        }
        types
    }

    /// Keys of password options.
    pub fn sensitive_keys(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.password)
            .map(|o| o.key.clone())
            .collect()
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("invocation", &self.invocation)
            .finish_non_exhaustive()
    }
}
