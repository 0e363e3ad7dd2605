/// Execution engine: run one command line end to end.
///
/// `Shell::execute` never fails: every problem ends up as an entry in the
/// returned `Response`. Between calls the shell is stateless apart from the
/// `SessionContext` the caller threads back in; calls on one session must be
/// serialized by the caller.
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use cmdshell_core::{
    EventBus, Options, Response, SessionContext, ShellError, ShellEvent, DEFAULT_EVENT_CAPACITY,
};

use crate::flags::parse_flags;
use crate::parser;
use crate::registry::CommandRegistry;
use crate::resolver::{OptionResolver, Resolution, DEFAULT_PROMPT_TEMPLATE};
use crate::scope::{completion, CommandScope};
use crate::types::{CommandDefinition, Invocation};

/// Tunables for one shell instance.
#[derive(Debug, Clone)]
pub struct ShellSettings {
    /// Answer that cancels a pending prompt (case-insensitive).
    pub cancel_keyword: String,
    /// Option keys that redirect a command to `help`.
    pub help_flags: Vec<String>,
    /// How many times one call may retry through the passive prefix.
    pub max_passive_depth: u32,
    pub prompt_template: String,
    pub event_capacity: usize,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            cancel_keyword: "cancel".to_string(),
            help_flags: vec!["?".to_string(), "help".to_string()],
            max_passive_depth: 1,
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// What the completion events report about a finished call.
struct Completed {
    command: Option<String>,
    options: Options,
    sensitive: Vec<String>,
}

impl Completed {
    fn nothing() -> Self {
        Self {
            command: None,
            options: Options::new(),
            sensitive: Vec::new(),
        }
    }

    fn command(cmd: &CommandDefinition, options: Options) -> Self {
        Self {
            command: Some(cmd.name.clone()),
            options,
            sensitive: cmd.sensitive_keys(),
        }
    }
}

pub struct Shell {
    registry: Arc<CommandRegistry>,
    resolver: OptionResolver,
    events: EventBus,
    settings: ShellSettings,
}

impl Shell {
    pub fn new(registry: CommandRegistry) -> Self {
        Self::with_settings(registry, ShellSettings::default())
    }

    pub fn with_settings(registry: CommandRegistry, settings: ShellSettings) -> Self {
        info!(commands = registry.len(), "[Shell] Initialized");
        Self {
            registry: Arc::new(registry),
            resolver: OptionResolver::with_template(settings.prompt_template.clone()),
            events: EventBus::with_capacity(settings.event_capacity),
            settings,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &ShellSettings {
        &self.settings
    }

    /// Receive `done` / `commandComplete` events for every later call.
    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.events.subscribe()
    }

    /// Execute one command line against `context`.
    ///
    /// `overrides` take precedence over options parsed from the line. They
    /// are ignored when the line answers a pending prompt.
    pub async fn execute(
        &self,
        cmd_str: &str,
        context: SessionContext,
        overrides: Option<Options>,
    ) -> Response {
        let mut res = Response::new(context);
        let completed = self
            .run(cmd_str, &mut res, overrides.unwrap_or_default())
            .await;
        self.finish(&res, completed);
        res
    }

    async fn run(&self, cmd_str: &str, res: &mut Response, mut overrides: Options) -> Option<Completed> {
        let mut line = cmd_str.to_string();
        let mut passive_depth = 0;
        let mut typed_name: Option<String> = None;
        let mut redirected = false;

        loop {
            let prompting = res.context.has_prompt();

            if !prompting && parser::is_invalid_input(&line) {
                res.report(&ShellError::InvalidInput);
                return None;
            }

            if line.trim().eq_ignore_ascii_case(&self.settings.cancel_keyword) {
                cancel_prompt(res);
                return Some(Completed::nothing());
            }

            // A pending prompt takes the raw line as its answer; otherwise
            // the line is tokenized and its arguments go to the flag parser.
            let (name, answered, args) = match res.context.clear_prompt() {
                Some(prompt) => {
                    let mut options = prompt.options;
                    options.insert(prompt.option.clone(), line.clone());
                    (prompt.cmd.to_lowercase(), Some((prompt.option, options)), Vec::new())
                }
                None => match parser::parse(&line) {
                    Ok(parsed) => (parsed.cmd_name, None, parsed.args),
                    Err(err) => {
                        res.report(&err);
                        return None;
                    }
                },
            };
            let typed = typed_name.get_or_insert_with(|| name.clone()).clone();

            let Some(cmd) = self
                .registry
                .lookup(&name)
                .filter(|c| c.can_access(&res.context, &name))
            else {
                if let Some(prefix) = res.context.passive_prefix() {
                    if passive_depth < self.settings.max_passive_depth {
                        passive_depth += 1;
                        debug!(%prefix, depth = passive_depth, "[Shell] Retrying through passive context");
                        line = format!("{prefix} {line}");
                        continue;
                    }
                    let err = ShellError::PassiveDepthExceeded { depth: passive_depth };
                    warn!(command = %typed, "[Shell] {}", err);
                }
                res.report(&ShellError::UnknownCommand { name: typed });
                return Some(Completed::nothing());
            };

            let mut options = match answered {
                Some((option, options)) => {
                    if cmd.option_spec(&option).is_some_and(|s| s.password) {
                        debug!(command = %cmd.name, %option, "[Shell] Prompt answered (redacted)");
                    } else {
                        debug!(command = %cmd.name, %option, "[Shell] Prompt answered");
                    }
                    options
                }
                None => parse_flags(&args, &cmd.flag_types()).merge(std::mem::take(&mut overrides)),
            };

            if !redirected
                && self.registry.has("help")
                && self.settings.help_flags.iter().any(|f| options.contains(f))
            {
                debug!(command = %cmd.name, "[Shell] Help flag present, redirecting to help");
                redirected = true;
                line = "help".to_string();
                overrides = Options::from_iter([("command", cmd.name.clone())]);
                continue;
            }

            match self.resolver.resolve(cmd, &mut options, res) {
                Resolution::Ready => {}
                Resolution::Prompted => return Some(Completed::command(cmd, options)),
                Resolution::Invalid(errors) => {
                    debug!(command = %cmd.name, errors = errors.len(), "[Shell] Options rejected");
                    return Some(Completed::command(cmd, options));
                }
            }

            self.invoke(cmd, &options, res).await;
            return Some(Completed::command(cmd, options));
        }
    }

    async fn invoke(&self, cmd: &CommandDefinition, options: &Options, res: &mut Response) {
        info!(command = %cmd.name, asynchronous = cmd.is_async(), "[Shell] Invoking command");
        let scope = CommandScope::new(&cmd.name, std::mem::take(res), Arc::clone(&self.registry));

        let outcome = match &cmd.invocation {
            Invocation::Sync(f) => f(&scope, options).map_err(|e| ShellError::fault(&cmd.name, e)),
            Invocation::Async(f) => {
                let (done, waiter) = completion(&cmd.name);
                match f(scope.clone(), options.clone(), done) {
                    Err(e) => Err(ShellError::fault(&cmd.name, e)),
                    Ok(()) => match waiter.await {
                        Ok(result) => result.map_err(|e| ShellError::fault(&cmd.name, e)),
                        Err(_) => Err(ShellError::CompletionDropped {
                            name: cmd.name.clone(),
                        }),
                    },
                }
            }
        };

        *res = scope.take_response();
        if let Err(err) = outcome {
            warn!(command = %cmd.name, error = %err, "[Shell] Command failed");
            res.report(&err);
        }
    }

    fn finish(&self, res: &Response, completed: Option<Completed>) {
        let prompt_pending = res.context.has_prompt();
        self.events.publish(ShellEvent::Done { prompt_pending });

        if prompt_pending {
            return;
        }
        if let Some(completed) = completed {
            self.events.publish(ShellEvent::CommandComplete {
                command: completed.command,
                data: res.context.data.clone(),
                options: completed.options,
                sensitive: completed.sensitive,
            });
        }
    }
}

fn cancel_prompt(res: &mut Response) {
    match res.context.clear_prompt() {
        Some(prompt) => {
            if let Some(previous) = prompt.previous_context {
                res.context = *previous;
            }
            res.warn("prompt canceled");
        }
        None => res.warn("there are no active prompts"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use anyhow::bail;
    use cmdshell_core::{LogLevel, PendingPrompt};
    use parking_lot::Mutex;
    use serde_json::json;

    use crate::types::OptionSpec;

    type Seen = Arc<Mutex<Vec<Options>>>;

    fn recorder(name: &str, seen: &Seen) -> CommandDefinition {
        let seen = Arc::clone(seen);
        CommandDefinition::sync(name, move |scope, options| {
            seen.lock().push(options.clone());
            scope.info(format!("ran {}", scope.command()));
            Ok(())
        })
    }

    fn greet(seen: &Seen) -> CommandDefinition {
        recorder("greet", seen).option(OptionSpec::new("name").required().no_name())
    }

    fn secret(seen: &Seen) -> CommandDefinition {
        recorder("secret", seen).option(
            OptionSpec::new("pass")
                .prompt_with("Enter password")
                .password(),
        )
    }

    fn shell(commands: Vec<CommandDefinition>) -> Shell {
        Shell::new(CommandRegistry::with_builtins(commands))
    }

    fn drain(rx: &mut broadcast::Receiver<ShellEvent>) -> Vec<ShellEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn greet_with_positional_name() {
        let seen = Seen::default();
        let shell = shell(vec![greet(&seen)]);

        let res = shell.execute("greet Alice", SessionContext::new(), None).await;

        assert!(!res.has_errors());
        assert_eq!(res.messages(LogLevel::Info), vec!["ran greet"]);
        assert_eq!(seen.lock()[0].get("name"), Some(&json!("Alice")));
    }

    #[tokio::test]
    async fn command_names_are_case_insensitive() {
        let seen = Seen::default();
        let shell = shell(vec![greet(&seen)]);

        for line in ["Greet a", "greet a", "GREET a"] {
            let res = shell.execute(line, SessionContext::new(), None).await;
            assert!(!res.has_errors(), "{line}");
        }
        assert_eq!(seen.lock().len(), 3);
    }

    #[tokio::test]
    async fn greet_without_name_is_missing_parameter() {
        let seen = Seen::default();
        let shell = shell(vec![greet(&seen)]);

        let res = shell.execute("greet", SessionContext::new(), None).await;

        assert_eq!(res.messages(LogLevel::Error), vec!["missing parameter \"name\""]);
        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn aliases_do_not_rescue_missing_required() {
        let seen = Seen::default();
        let shell = shell(vec![
            recorder("send", &seen).option(OptionSpec::new("to").required().aliases(["t"])),
        ]);

        let res = shell.execute("send --x 1", SessionContext::new(), None).await;
        assert_eq!(res.messages(LogLevel::Error), vec!["missing parameter \"to\""]);

        let res = shell.execute("send -t bob", SessionContext::new(), None).await;
        assert!(!res.has_errors());
        assert_eq!(seen.lock()[0].get("to"), Some(&json!("bob")));
    }

    #[tokio::test]
    async fn password_prompt_round_trip() {
        let seen = Seen::default();
        let shell = shell(vec![secret(&seen)]);

        let res = shell.execute("secret", SessionContext::new(), None).await;
        assert!(res.password);
        assert_eq!(res.messages(LogLevel::Info), vec!["Enter password"]);
        assert_eq!(
            res.context.prompt,
            Some(PendingPrompt::new("pass", "secret", Options::new()))
        );
        assert!(seen.lock().is_empty());

        let res = shell.execute("hunter2", res.context, None).await;
        assert!(!res.password);
        assert!(res.context.prompt.is_none());
        assert_eq!(seen.lock()[0].get("pass"), Some(&json!("hunter2")));
    }

    #[tokio::test]
    async fn prompt_answer_is_stored_verbatim() {
        let seen = Seen::default();
        let shell = shell(vec![secret(&seen)]);
        let res = shell.execute("secret", SessionContext::new(), None).await;

        let answer = r#"  "a | b" && (c) ' "#;
        let res = shell.execute(answer, res.context, None).await;

        assert!(!res.has_errors());
        assert_eq!(seen.lock()[0].get("pass"), Some(&json!(answer)));
    }

    #[tokio::test]
    async fn prompt_skips_later_keys_then_resumes() {
        let seen = Seen::default();
        let shell = shell(vec![recorder("login", &seen)
            .option(OptionSpec::new("user").no_name().prompt())
            .option(OptionSpec::new("mode").required())]);

        let res = shell.execute("login", SessionContext::new(), None).await;
        assert!(!res.has_errors());
        assert_eq!(res.messages(LogLevel::Info), vec!["Enter value for user."]);

        let res = shell.execute("ada", res.context, None).await;
        assert_eq!(res.messages(LogLevel::Error), vec!["missing parameter \"mode\""]);
        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn consecutive_prompts_chain() {
        let seen = Seen::default();
        let shell = shell(vec![recorder("login", &seen)
            .option(OptionSpec::new("user").prompt())
            .option(OptionSpec::new("pass").prompt().password())]);

        let res = shell.execute("login", SessionContext::new(), None).await;
        let res = shell.execute("ada", res.context, None).await;
        assert!(res.password);
        assert_eq!(res.context.prompt.as_ref().map(|p| p.option.as_str()), Some("pass"));

        let res = shell.execute("s3cret", res.context, None).await;
        assert!(res.context.prompt.is_none());
        let seen = seen.lock();
        let options = &seen[0];
        assert_eq!(options.get("user"), Some(&json!("ada")));
        assert_eq!(options.get("pass"), Some(&json!("s3cret")));
    }

    #[tokio::test]
    async fn cancel_restores_previous_context() {
        let shell = shell(Vec::new());
        let mut previous = SessionContext::new();
        previous.set_data("step", 1);

        let mut context = SessionContext::new();
        context.set_data("step", 2);
        context.prompt = Some(
            PendingPrompt::new("x", "whatever", Options::new()).with_previous_context(previous.clone()),
        );

        let res = shell.execute("CANCEL", context, None).await;
        assert_eq!(res.messages(LogLevel::Warn), vec!["prompt canceled"]);
        assert_eq!(res.context, previous);
    }

    #[tokio::test]
    async fn cancel_without_previous_context_clears_prompt() {
        let seen = Seen::default();
        let shell = shell(vec![secret(&seen)]);
        let res = shell.execute("secret", SessionContext::new(), None).await;

        let res = shell.execute("cancel", res.context, None).await;
        assert!(res.context.prompt.is_none());
        assert_eq!(res.messages(LogLevel::Warn), vec!["prompt canceled"]);
        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn cancel_without_prompt_only_warns() {
        let shell = shell(Vec::new());
        let mut context = SessionContext::new();
        context.set_data("k", "v");

        let res = shell.execute("cancel", context.clone(), None).await;
        assert_eq!(res.messages(LogLevel::Warn), vec!["there are no active prompts"]);
        assert!(!res.has_errors());
        assert_eq!(res.context, context);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let shell = shell(Vec::new());
        let mut rx = shell.subscribe();

        for line in ["", "  ", "\"", "| &", "echo (x)"] {
            let res = shell.execute(line, SessionContext::new(), None).await;
            assert_eq!(res.messages(LogLevel::Error), vec!["Invalid input."], "{line:?}");
        }
        let events = drain(&mut rx);
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| *e == ShellEvent::Done { prompt_pending: false }));
    }

    #[tokio::test]
    async fn unknown_command_is_reported() {
        let shell = shell(Vec::new());
        let res = shell.execute("Nope arg", SessionContext::new(), None).await;
        assert_eq!(res.messages(LogLevel::Error), vec!["\"nope\" is not a valid command"]);
    }

    #[tokio::test]
    async fn access_denied_looks_like_unknown() {
        let seen = Seen::default();
        let shell = shell(vec![recorder("admin", &seen)
            .access(|session, _| session.get_data("role") == Some(&json!("admin")))]);

        let res = shell.execute("admin", SessionContext::new(), None).await;
        assert_eq!(res.messages(LogLevel::Error), vec!["\"admin\" is not a valid command"]);

        let mut context = SessionContext::new();
        context.set_data("role", "admin");
        let res = shell.execute("admin", context, None).await;
        assert!(!res.has_errors());
        assert_eq!(seen.lock().len(), 1);
    }

    #[tokio::test]
    async fn passive_context_prefixes_unknown_input() {
        let seen = Seen::default();
        let shell = shell(vec![recorder("calc", &seen).option(OptionSpec::new("expr").no_name())]);
        let mut context = SessionContext::new();
        context.set_passive("calc");

        let res = shell.execute("2+2", context, None).await;
        assert!(!res.has_errors());
        assert_eq!(seen.lock()[0].get("expr"), Some(&json!("2+2")));
        assert!(res.context.passive.is_some());
    }

    #[tokio::test]
    async fn self_referential_passive_context_terminates() {
        let shell = shell(Vec::new());
        let mut context = SessionContext::new();
        context.set_passive("ghost");

        let res = shell.execute("boo", context, None).await;
        assert_eq!(res.messages(LogLevel::Error), vec!["\"boo\" is not a valid command"]);
    }

    #[tokio::test]
    async fn deeper_passive_limit_is_honored() {
        let seen = Seen::default();
        let settings = ShellSettings {
            max_passive_depth: 3,
            ..ShellSettings::default()
        };
        let shell = Shell::with_settings(
            CommandRegistry::with_builtins(vec![greet(&seen)]),
            settings,
        );
        let mut context = SessionContext::new();
        context.set_passive("ghost");

        let res = shell.execute("boo", context, None).await;
        assert_eq!(res.messages(LogLevel::Error), vec!["\"boo\" is not a valid command"]);
    }

    #[tokio::test]
    async fn overrides_beat_parsed_flags() {
        let seen = Seen::default();
        let shell = shell(vec![greet(&seen)]);

        let overrides = Options::from_iter([("name", "Bob")]);
        let res = shell
            .execute("greet --name Alice --loud", SessionContext::new(), Some(overrides))
            .await;

        assert!(!res.has_errors());
        let seen = seen.lock();
        let options = &seen[0];
        assert_eq!(options.get("name"), Some(&json!("Bob")));
        assert_eq!(options.get("loud"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn typed_options_steer_flag_parsing() {
        let seen = Seen::default();
        let shell = shell(vec![recorder("copy", &seen)
            .option(OptionSpec::new("force").boolean().aliases(["f"]))
            .option(OptionSpec::new("src").no_name())]);

        shell.execute("copy -f notes.txt", SessionContext::new(), None).await;
        let seen = seen.lock();
        let options = &seen[0];
        assert_eq!(options.get("force"), Some(&json!(true)));
        assert_eq!(options.get("src"), Some(&json!("notes.txt")));
    }

    #[tokio::test]
    async fn help_flag_redirects_to_help() {
        let seen = Seen::default();
        let shell = shell(vec![greet(&seen).describe("Say hello")]);

        let res = shell.execute("greet --help", SessionContext::new(), None).await;
        assert!(seen.lock().is_empty());
        let info = res.messages(LogLevel::Info);
        assert_eq!(info[0], "Usage: greet <name>");
        assert_eq!(info[1], "Say hello");

        let res = shell.execute("greet -?", SessionContext::new(), None).await;
        assert_eq!(res.messages(LogLevel::Info)[0], "Usage: greet <name>");
    }

    #[tokio::test]
    async fn help_flag_reaches_command_without_help_builtin() {
        let seen = Seen::default();
        let mut registry = CommandRegistry::new();
        registry.register(greet(&seen)).unwrap();
        let mut context = SessionContext::new();
        context.set_passive("greet");
        let shell = Shell::new(registry);

        let res = shell.execute("greet Alice --help", context, None).await;

        assert!(!res.has_errors());
        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].get("name"), Some(&json!("Alice")));
        assert_eq!(seen[0].get("help"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn help_lists_visible_commands() {
        let seen = Seen::default();
        let shell = shell(vec![
            greet(&seen).describe("Say hello"),
            recorder("hidden", &seen).access(|_, _| false),
        ]);

        let res = shell.execute("help", SessionContext::new(), None).await;
        let info = res.messages(LogLevel::Info).join("\n");
        assert!(info.contains("greet"));
        assert!(info.contains("help"));
        assert!(!info.contains("hidden"));
    }

    #[tokio::test]
    async fn sync_fault_becomes_error_entry() {
        let shell = shell(vec![CommandDefinition::sync("boom", |scope, _| {
            scope.info("about to fail");
            bail!("disk on fire")
        })]);

        let res = shell.execute("boom", SessionContext::new(), None).await;
        assert_eq!(res.messages(LogLevel::Info), vec!["about to fail"]);
        assert_eq!(res.messages(LogLevel::Error), vec!["disk on fire"]);
    }

    #[tokio::test]
    async fn async_command_completes_before_events() {
        let shell = shell(vec![CommandDefinition::asynchronous("later", |scope, options, done| {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                scope.info(format!("waited for {}", options.get_str("who").unwrap_or_default()));
                scope.set_data("last", "later");
                done.done();
            });
            Ok(())
        })]);
        let mut rx = shell.subscribe();

        let res = shell.execute("later --who ada", SessionContext::new(), None).await;

        assert_eq!(res.messages(LogLevel::Info), vec!["waited for ada"]);
        let events = drain(&mut rx);
        assert_eq!(events[0], ShellEvent::Done { prompt_pending: false });
        match &events[1] {
            ShellEvent::CommandComplete { command, data, options, .. } => {
                assert_eq!(command.as_deref(), Some("later"));
                assert_eq!(data.get("last"), Some(&json!("later")));
                assert_eq!(options.get("who"), Some(&json!("ada")));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn async_failures_are_reported() {
        let shell = shell(vec![
            CommandDefinition::asynchronous("fails", |_, _, done| {
                done.fail(anyhow::anyhow!("upstream timeout"));
                Ok(())
            }),
            CommandDefinition::asynchronous("throws", |_, _, _done| bail!("bad setup")),
            CommandDefinition::asynchronous("forgets", |_, _, done| {
                drop(done);
                Ok(())
            }),
        ]);

        let res = shell.execute("fails", SessionContext::new(), None).await;
        assert_eq!(res.messages(LogLevel::Error), vec!["upstream timeout"]);

        let res = shell.execute("throws", SessionContext::new(), None).await;
        assert_eq!(res.messages(LogLevel::Error), vec!["bad setup"]);

        let res = shell.execute("forgets", SessionContext::new(), None).await;
        assert_eq!(
            res.messages(LogLevel::Error),
            vec!["command \"forgets\" finished without signalling completion"]
        );
    }

    #[tokio::test]
    async fn prompt_suppresses_command_complete() {
        let seen = Seen::default();
        let shell = shell(vec![secret(&seen)]);
        let mut rx = shell.subscribe();

        let res = shell.execute("secret", SessionContext::new(), None).await;
        assert_eq!(drain(&mut rx), vec![ShellEvent::Done { prompt_pending: true }]);

        shell.execute("pw", res.context, None).await;
        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        match &events[1] {
            ShellEvent::CommandComplete { sensitive, .. } => assert_eq!(sensitive, &vec!["pass".to_string()]),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn command_can_set_its_own_prompt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let shell = shell(vec![CommandDefinition::sync("confirm", move |scope, options| {
            counter.fetch_add(1, Ordering::SeqCst);
            match options.get_str("answer") {
                None => scope.set_prompt(
                    PendingPrompt::new("answer", "confirm", options.clone())
                        .with_previous_context(scope.context()),
                    "Are you sure?",
                    false,
                ),
                Some(answer) => scope.info(format!("answer: {answer}")),
            }
            Ok(())
        })]);

        let res = shell.execute("confirm", SessionContext::new(), None).await;
        assert_eq!(res.messages(LogLevel::Info), vec!["Are you sure?"]);
        let res = shell.execute("yes", res.context, None).await;
        assert_eq!(res.messages(LogLevel::Info), vec!["answer: yes"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn session_data_survives_between_calls() {
        let shell = shell(vec![
            CommandDefinition::sync("set", |scope, options| {
                scope.set_data("v", options.get("value").cloned().unwrap_or_default());
                Ok(())
            })
            .option(OptionSpec::new("value").no_name()),
        ]);

        let res = shell.execute("set 7", SessionContext::new(), None).await;
        assert_eq!(res.context.get_data("v"), Some(&json!(7)));
    }
}
