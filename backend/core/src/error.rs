use thiserror::Error;

/// Every failure the shell can report.
///
/// The `Display` output of each variant is the exact message written into a
/// [`Response`](crate::Response), so hosts see the same text whether they
/// render the log or match on the error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("Invalid input.")]
    InvalidInput,

    #[error("\"{name}\" is not a valid command")]
    UnknownCommand { name: String },

    #[error("\"{name}\" was not loaded because a command with the same name was already loaded")]
    DuplicateCommand { name: String },

    #[error("invalid value for \"{key}\"")]
    InvalidValue { key: String },

    #[error("missing parameter \"{key}\"")]
    MissingParameter { key: String },

    #[error("{message}")]
    CommandFault { name: String, message: String },

    #[error("command \"{name}\" finished without signalling completion")]
    CompletionDropped { name: String },

    #[error("passive fallback exceeded {depth} level(s)")]
    PassiveDepthExceeded { depth: u32 },
}

impl ShellError {
    /// Wrap a fault raised by a command's own logic.
    pub fn fault(name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::CommandFault {
            name: name.into(),
            message: err.to_string(),
        }
    }
}
