/// Option resolution: turn parsed arguments into a validated options map.
///
/// Specs are visited in declared order. For each key: fill from a positional
/// argument (`no_name`), else from the first alias present, else stop and
/// prompt, else apply the default; then validate and check `required`.
/// A prompt halts resolution at once. Invalid and missing values are
/// collected so that every error of one invocation is reported together.
use tracing::debug;

use cmdshell_core::{Options, PendingPrompt, Response, ShellError};

use crate::types::{CommandDefinition, OptionSpec, PromptSpec, Verdict};

/// Default text for generated prompts; `{key}` is replaced by the option key.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "Enter value for {key}.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Options are complete and valid.
    Ready,
    /// A prompt was recorded in the response context.
    Prompted,
    /// One or more options were invalid or missing.
    Invalid(Vec<ShellError>),
}

#[derive(Debug, Clone)]
pub struct OptionResolver {
    prompt_template: String,
}

impl OptionResolver {
    pub fn new() -> Self {
        Self::with_template(DEFAULT_PROMPT_TEMPLATE)
    }

    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            prompt_template: template.into(),
        }
    }

    /// Resolve `options` in place against `cmd`, writing prompts and errors
    /// into `res`.
    pub fn resolve(&self, cmd: &CommandDefinition, options: &mut Options, res: &mut Response) -> Resolution {
        let mut errors = Vec::new();

        for spec in &cmd.options {
            let key = spec.key.as_str();

            if !options.contains(key) && spec.no_name {
                if let Some(value) = options.take_positional() {
                    options.insert(key, value);
                }
            }

            if !options.contains(key) && !spec.no_name {
                fill_from_alias(spec, options);
            }

            if !options.contains(key) && spec.prompt.is_enabled() {
                self.record_prompt(cmd, spec, options, res);
                return Resolution::Prompted;
            }

            if !options.contains(key) {
                if let Some(default) = &spec.default {
                    options.insert(key, default.clone());
                }
            }

            if let (Some(validator), Some(value)) = (&spec.validate, options.get(key)) {
                let verdict = validator.check(value);
                if let Verdict::Faulted(reason) = &verdict {
                    debug!(command = %cmd.name, option = key, %reason, "[Resolver] Validator faulted");
                }
                if !verdict.is_valid() {
                    let err = ShellError::InvalidValue { key: key.to_string() };
                    res.report(&err);
                    errors.push(err);
                }
            }

            if spec.required && !options.contains(key) {
                let err = ShellError::MissingParameter { key: key.to_string() };
                res.report(&err);
                errors.push(err);
            }
        }

        if errors.is_empty() {
            Resolution::Ready
        } else {
            Resolution::Invalid(errors)
        }
    }

    fn record_prompt(&self, cmd: &CommandDefinition, spec: &OptionSpec, options: &Options, res: &mut Response) {
        debug!(command = %cmd.name, option = %spec.key, "[Resolver] Prompting for missing option");
        res.context.prompt = Some(PendingPrompt::new(&spec.key, &cmd.name, options.clone()));
        if spec.password {
            res.password = true;
        }
        let message = match &spec.prompt {
            PromptSpec::Message(message) => message.clone(),
            _ => self.prompt_template.replace("{key}", &spec.key),
        };
        res.info(message);
    }
}

impl Default for OptionResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Move the value of the first alias present onto the spec key.
fn fill_from_alias(spec: &OptionSpec, options: &mut Options) {
    let Some(alias) = spec.aliases.iter().find(|a| options.contains(a)) else {
        return;
    };
    if let Some(value) = options.remove(alias) {
        options.insert(spec.key.as_str(), value);
    }
}
