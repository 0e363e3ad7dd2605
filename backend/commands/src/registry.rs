/// Command registry: lowercase name to command definition.
///
/// Registration is first-wins: a second definition with a name already
/// present is rejected and logged, and never replaces the first.
use std::collections::BTreeMap;

use tracing::{debug, warn};

use cmdshell_core::ShellError;

use crate::handlers::builtin_commands;
use crate::types::CommandDefinition;

#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandDefinition>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `commands` followed by the built-ins. Host commands
    /// registered first shadow built-ins of the same name.
    pub fn with_builtins(commands: impl IntoIterator<Item = CommandDefinition>) -> Self {
        let mut registry = Self::new();
        registry.register_all(commands);
        registry.install_builtins();
        registry
    }

    /// Register one command. Rejects a name that is already taken.
    pub fn register(&mut self, mut def: CommandDefinition) -> Result<(), ShellError> {
        def.name = def.name.to_lowercase();
        if self.commands.contains_key(&def.name) {
            let err = ShellError::DuplicateCommand { name: def.name };
            warn!("[Registry] {}", err);
            return Err(err);
        }
        debug!(command = %def.name, asynchronous = def.is_async(), "[Registry] Registered command");
        self.commands.insert(def.name.clone(), def);
        Ok(())
    }

    /// Register many commands, skipping collisions. Returns the rejections.
    pub fn register_all(
        &mut self,
        commands: impl IntoIterator<Item = CommandDefinition>,
    ) -> Vec<ShellError> {
        commands
            .into_iter()
            .filter_map(|def| self.register(def).err())
            .collect()
    }

    /// Add the built-in commands after whatever the host registered.
    pub fn install_builtins(&mut self) -> Vec<ShellError> {
        self.register_all(builtin_commands())
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(&name.to_lowercase())
    }

    pub fn has(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// All commands sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.commands.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
