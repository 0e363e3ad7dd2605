/// Built-in command handlers.
///
/// Installed after host commands, so a host command with the same name
/// replaces the built-in.
use anyhow::Result;

use cmdshell_core::{Options, ShellError};

use crate::scope::CommandScope;
use crate::types::{CommandDefinition, OptionKind, OptionSpec, PromptSpec};

pub fn builtin_commands() -> Vec<CommandDefinition> {
    vec![help_command()]
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

fn help_command() -> CommandDefinition {
    CommandDefinition::sync("help", show_help)
        .describe("List available commands, or show the options of one command.")
        .option(
            OptionSpec::new("command")
                .string()
                .no_name()
                .describe("Command to describe"),
        )
}

fn show_help(scope: &CommandScope, options: &Options) -> Result<()> {
    let session = scope.context();
    let registry = scope.registry();

    let Some(name) = options.get_str("command").filter(|n| !n.is_empty()) else {
        scope.info("Available commands:");
        for def in registry.iter().filter(|d| d.can_access(&session, &d.name)) {
            scope.info(format!("  {:<12} {}", def.name, def.description));
        }
        return Ok(());
    };

    let name = name.to_lowercase();
    let Some(def) = registry.lookup(&name).filter(|d| d.can_access(&session, &name)) else {
        scope.error(ShellError::UnknownCommand { name }.to_string());
        return Ok(());
    };

    scope.info(usage_line(def));
    if !def.description.is_empty() {
        scope.info(def.description.clone());
    }
    for spec in &def.options {
        scope.info(format!("  {}", describe_option(spec)));
    }
    Ok(())
}

fn usage_line(def: &CommandDefinition) -> String {
    let mut parts = vec![def.name.clone()];
    for spec in &def.options {
        let placeholder = if spec.no_name {
            format!("<{}>", spec.key)
        } else {
            format!("--{}", spec.key)
        };
        if spec.required {
            parts.push(placeholder);
        } else {
            parts.push(format!("[{placeholder}]"));
        }
    }
    format!("Usage: {}", parts.join(" "))
}

fn describe_option(spec: &OptionSpec) -> String {
    let mut names = vec![format!("--{}", spec.key)];
    names.extend(spec.aliases.iter().map(|a| {
        if a.chars().count() == 1 {
            format!("-{a}")
        } else {
            format!("--{a}")
        }
    }));

    let mut line = names.join(", ");
    match spec.kind {
        Some(OptionKind::String) => line.push_str(" <string>"),
        Some(OptionKind::Boolean) => line.push_str(" <boolean>"),
        None => {}
    }

    let mut notes = Vec::new();
    if spec.required {
        notes.push("required".to_string());
    }
    if spec.prompt != PromptSpec::Off {
        notes.push("prompts".to_string());
    }
    if let Some(default) = &spec.default {
        notes.push(format!("default: {default}"));
    }
    if !notes.is_empty() {
        line.push_str(&format!(" ({})", notes.join(", ")));
    }
    if let Some(description) = &spec.description {
        line.push_str(&format!("  {description}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_marks_required_and_positional() {
        let def = CommandDefinition::sync("greet", |_, _| Ok(()))
            .option(OptionSpec::new("name").required().no_name())
            .option(OptionSpec::new("loud").boolean());
        assert_eq!(usage_line(&def), "Usage: greet <name> [--loud]");
    }

    #[test]
    fn option_line_lists_aliases_and_notes() {
        let spec = OptionSpec::new("target")
            .string()
            .aliases(["t", "to"])
            .required()
            .describe("Where to send it");
        assert_eq!(
            describe_option(&spec),
            "--target, -t, --to <string> (required)  Where to send it"
        );
    }
}
