//! Demo command set registered by the `cmdshell` binary.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::bail;
use regex::Regex;
use serde_json::Value;

use cmdshell_commands::{CommandDefinition, CommandScope, Completion, OptionSpec};
use cmdshell_core::{Options, PendingPrompt};

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

pub fn commands() -> Vec<CommandDefinition> {
    vec![
        greet(),
        echo(),
        login(),
        whoami(),
        logout(),
        sleep(),
        set(),
        get(),
        reset(),
        mode(),
        fail(),
    ]
}

fn greet() -> CommandDefinition {
    CommandDefinition::sync("greet", |scope, options| {
        let name = options.get_str("name").unwrap_or_default();
        let line = format!("Hello, {name}!");
        if options.get_bool("loud").unwrap_or(false) {
            scope.info(line.to_uppercase());
        } else {
            scope.info(line);
        }
        Ok(())
    })
    .describe("Greet someone.")
    .option(OptionSpec::new("name").string().no_name().required().describe("Who to greet"))
    .option(OptionSpec::new("loud").boolean().aliases(["l"]).describe("Shout"))
}

fn echo() -> CommandDefinition {
    CommandDefinition::sync("echo", |scope, options| {
        let words: Vec<String> = options
            .get_str("text")
            .into_iter()
            .chain(options.positional().iter().map(cmdshell_core::value_to_string))
            .collect();
        let line = words.join(" ");
        if options.get_bool("upper").unwrap_or(false) {
            scope.info(line.to_uppercase());
        } else {
            scope.info(line);
        }
        Ok(())
    })
    .describe("Print the arguments back.")
    .option(OptionSpec::new("text").string().no_name())
    .option(OptionSpec::new("upper").boolean().aliases(["u"]).describe("Uppercase the output"))
}

fn login() -> CommandDefinition {
    CommandDefinition::asynchronous("login", |scope: CommandScope, options: Options, done: Completion| {
        let user = options.get_str("user").unwrap_or_default();
        tokio::spawn(async move {
            // Stands in for a remote credential check.
            tokio::time::sleep(Duration::from_millis(50)).await;
            scope.set_data("user", user.clone());
            scope.info(format!("Logged in as {user}."));
            done.done();
        });
        Ok(())
    })
    .describe("Sign in; asks for anything not given.")
    .option(OptionSpec::new("user").string().aliases(["u"]).prompt_with("Username:"))
    .option(OptionSpec::new("pass").string().prompt_with("Password:").password())
}

fn whoami() -> CommandDefinition {
    CommandDefinition::sync("whoami", |scope, _| {
        if let Some(user) = scope.data("user") {
            scope.info(cmdshell_core::value_to_string(&user));
        }
        Ok(())
    })
    .describe("Show the signed-in user.")
    .access(|session, _| session.get_data("user").is_some())
}

fn logout() -> CommandDefinition {
    CommandDefinition::sync("logout", |scope, _| {
        scope.update_context(|ctx| ctx.data.remove("user"));
        scope.info("Logged out.");
        Ok(())
    })
    .describe("Sign out.")
    .access(|session, _| session.get_data("user").is_some())
}

fn sleep() -> CommandDefinition {
    CommandDefinition::asynchronous("sleep", |scope: CommandScope, options: Options, done: Completion| {
        let ms: u64 = options.get_str("ms").unwrap_or_default().parse()?;
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            scope.info(format!("Slept {ms}ms."));
            done.done();
        });
        Ok(())
    })
    .describe("Wait, then report.")
    .option(
        OptionSpec::new("ms")
            .string()
            .no_name()
            .required()
            .matches(DIGITS_RE.clone())
            .describe("Milliseconds"),
    )
}

fn set() -> CommandDefinition {
    CommandDefinition::sync("set", |scope, options| {
        let key = options.get_str("key").unwrap_or_default();
        let value = options.get("value").cloned().unwrap_or(Value::Null);
        scope.set_data(key, value);
        Ok(())
    })
    .describe("Store a value in the session.")
    .option(OptionSpec::new("key").string().no_name().required())
    .option(OptionSpec::new("value").no_name().required())
}

fn get() -> CommandDefinition {
    CommandDefinition::sync("get", |scope, options| {
        let key = options.get_str("key").unwrap_or_default();
        match scope.data(&key) {
            Some(value) => scope.info(cmdshell_core::value_to_string(&value)),
            None => scope.warn(format!("\"{key}\" is not set")),
        }
        Ok(())
    })
    .describe("Read a session value.")
    .option(OptionSpec::new("key").string().no_name().required())
}

/// Clears session data after the command itself asks for confirmation.
fn reset() -> CommandDefinition {
    CommandDefinition::sync("reset", |scope, options| {
        match options.get_str("confirm").map(|c| c.to_lowercase()) {
            None => {
                let prompt = PendingPrompt::new("confirm", "reset", options.clone());
                scope.set_prompt(prompt, "Clear all session data? (yes/no)", false);
            }
            Some(answer) if answer == "yes" || answer == "y" => {
                scope.update_context(|ctx| ctx.data.clear());
                scope.info("Session data cleared.");
            }
            Some(_) => scope.info("Nothing changed."),
        }
        Ok(())
    })
    .describe("Clear all session data.")
    .option(OptionSpec::new("confirm").string())
}

fn mode() -> CommandDefinition {
    CommandDefinition::sync("mode", |scope, options| {
        if options.get_bool("off").unwrap_or(false) {
            scope.clear_passive();
            scope.info("Passive mode off.");
            return Ok(());
        }
        match options.get_str("prefix").filter(|p| !p.trim().is_empty()) {
            Some(prefix) => {
                scope.info(format!("Unknown commands now run as \"{prefix} ...\"."));
                scope.set_passive(prefix);
            }
            None => match scope.context().passive_prefix() {
                Some(prefix) => scope.info(format!("Passive prefix: {prefix}")),
                None => scope.info("Passive mode is off."),
            },
        }
        Ok(())
    })
    .describe("Route unknown commands through a prefix command.")
    .option(OptionSpec::new("prefix").string().no_name())
    .option(OptionSpec::new("off").boolean())
}

fn fail() -> CommandDefinition {
    CommandDefinition::sync("fail", |_, options| {
        let reason = options.get_str("reason").unwrap_or_else(|| "requested failure".into());
        bail!(reason)
    })
    .describe("Fail on purpose.")
    .option(OptionSpec::new("reason").string().no_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdshell_commands::{CommandRegistry, Shell};
    use cmdshell_core::{LogLevel, SessionContext};

    fn shell() -> Shell {
        Shell::new(CommandRegistry::with_builtins(commands()))
    }

    #[tokio::test]
    async fn login_prompts_then_signs_in() {
        let shell = shell();
        let res = shell.execute("login", SessionContext::new(), None).await;
        assert_eq!(res.messages(LogLevel::Info), vec!["Username:"]);

        let res = shell.execute("ada", res.context, None).await;
        assert!(res.password);
        assert_eq!(res.messages(LogLevel::Info), vec!["Password:"]);

        let res = shell.execute("hunter2", res.context, None).await;
        assert_eq!(res.messages(LogLevel::Info), vec!["Logged in as ada."]);
        assert_eq!(res.context.get_data("user"), Some(&Value::from("ada")));

        let res = shell.execute("whoami", res.context, None).await;
        assert_eq!(res.messages(LogLevel::Info), vec!["ada"]);
    }

    #[tokio::test]
    async fn login_alias_skips_username_prompt() {
        let res = shell().execute("login -u ada", SessionContext::new(), None).await;
        assert!(res.password);
        assert_eq!(res.messages(LogLevel::Info), vec!["Password:"]);
        let prompt = res.context.prompt.as_ref().unwrap();
        assert_eq!(prompt.option, "pass");
        assert_eq!(prompt.options.get("user"), Some(&Value::from("ada")));
    }

    #[tokio::test]
    async fn whoami_hidden_until_signed_in() {
        let res = shell().execute("whoami", SessionContext::new(), None).await;
        assert_eq!(res.messages(LogLevel::Error), vec!["\"whoami\" is not a valid command"]);
    }

    #[tokio::test]
    async fn sleep_rejects_non_numbers() {
        let res = shell().execute("sleep soon", SessionContext::new(), None).await;
        assert_eq!(res.messages(LogLevel::Error), vec!["invalid value for \"ms\""]);
    }

    #[tokio::test]
    async fn reset_asks_first() {
        let shell = shell();
        let mut context = SessionContext::new();
        context.set_data("k", "v");

        let res = shell.execute("reset", context, None).await;
        assert!(res.context.has_prompt());

        let res = shell.execute("yes", res.context, None).await;
        assert_eq!(res.messages(LogLevel::Info), vec!["Session data cleared."]);
        assert!(res.context.data.is_empty());
    }

    #[tokio::test]
    async fn mode_routes_unknown_commands() {
        let shell = shell();
        let res = shell.execute("mode echo", SessionContext::new(), None).await;
        let res = shell.execute("hello there", res.context, None).await;
        assert_eq!(res.messages(LogLevel::Info), vec!["hello there"]);

        let res = shell.execute("mode --off", res.context, None).await;
        assert!(res.context.passive.is_none());
    }

    #[tokio::test]
    async fn fail_reports_reason() {
        let res = shell().execute("fail broken", SessionContext::new(), None).await;
        assert_eq!(res.messages(LogLevel::Error), vec!["broken"]);
    }
}
