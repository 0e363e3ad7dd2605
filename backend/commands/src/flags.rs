/// Flag parsing: turn residual argument tokens into named options plus a
/// positional list.
///
/// Supports `--key=value`, `--key value`, `-k value`, grouped short flags
/// (`-abc`), `--no-key` negation and `--` as the end of flags. Keys declared
/// as string or boolean steer how values are read and coerced.
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

use cmdshell_core::Options;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?(0|[1-9]\d*)(\.\d+)?$").unwrap());

/// Per-command declaration of which flag keys are strings or booleans.
#[derive(Debug, Clone, Default)]
pub struct FlagTypes {
    strings: HashSet<String>,
    booleans: HashSet<String>,
}

impl FlagTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn string(&mut self, key: impl Into<String>) -> &mut Self {
        self.strings.insert(key.into());
        self
    }

    pub fn boolean(&mut self, key: impl Into<String>) -> &mut Self {
        self.booleans.insert(key.into());
        self
    }

    pub fn is_string(&self, key: &str) -> bool {
        self.strings.contains(key)
    }

    pub fn is_boolean(&self, key: &str) -> bool {
        self.booleans.contains(key)
    }

    fn coerce(&self, key: &str, raw: &str) -> Value {
        if self.is_string(key) {
            return Value::String(raw.to_string());
        }
        if self.is_boolean(key) {
            if let Some(b) = parse_bool(raw) {
                return Value::Bool(b);
            }
        }
        coerce_scalar(raw)
    }
}

/// Parse `tokens` into an [`Options`] mapping.
pub fn parse_flags<S: AsRef<str>>(tokens: &[S], types: &FlagTypes) -> Options {
    let mut options = Options::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].as_ref();

        if token == "--" {
            for rest in &tokens[i + 1..] {
                options.push_positional(coerce_scalar(rest.as_ref()));
            }
            break;
        }

        if let Some(body) = token.strip_prefix("--").filter(|b| !b.is_empty()) {
            if body.starts_with('=') || body == "no-" {
                // No key to assign to.
                options.push_positional(coerce_scalar(token));
            } else if let Some((key, raw)) = body.split_once('=') {
                set(&mut options, key, types.coerce(key, raw));
            } else if let Some(key) = body.strip_prefix("no-").filter(|k| !types.is_string(k)) {
                set(&mut options, key, Value::Bool(false));
            } else {
                i += read_value(&mut options, body, &tokens[i + 1..], types);
            }
        } else if is_short_flag(token) {
            let letters = &token[1..];
            if let Some((key, raw)) = letters.split_once('=').filter(|(k, _)| k.chars().count() == 1) {
                set(&mut options, key, types.coerce(key, raw));
            } else {
                let keys: Vec<String> = letters.chars().map(String::from).collect();
                if let Some((last, leading)) = keys.split_last() {
                    for key in leading {
                        set(&mut options, key, bare_flag_value(key, types));
                    }
                    i += read_value(&mut options, last, &tokens[i + 1..], types);
                }
            }
        } else {
            options.push_positional(coerce_scalar(token));
        }

        i += 1;
    }

    options
}

/// Assign a value to `key`, taking it from the next token where allowed.
/// Returns how many extra tokens were consumed.
fn read_value<S: AsRef<str>>(options: &mut Options, key: &str, rest: &[S], types: &FlagTypes) -> usize {
    let next = rest.first().map(|s| s.as_ref());

    if types.is_boolean(key) {
        if let Some(b) = next.and_then(parse_bool) {
            set(options, key, Value::Bool(b));
            return 1;
        }
        set(options, key, Value::Bool(true));
        return 0;
    }

    match next {
        Some(value) if !looks_like_flag(value) => {
            set(options, key, types.coerce(key, value));
            1
        }
        _ => {
            set(options, key, bare_flag_value(key, types));
            0
        }
    }
}

fn bare_flag_value(key: &str, types: &FlagTypes) -> Value {
    if types.is_string(key) {
        Value::String(String::new())
    } else {
        Value::Bool(true)
    }
}

/// Repeated keys collect into an array.
fn set(options: &mut Options, key: &str, value: Value) {
    let merged = match options.remove(key) {
        None => value,
        Some(Value::Array(mut items)) => {
            items.push(value);
            Value::Array(items)
        }
        Some(previous) => Value::Array(vec![previous, value]),
    };
    options.insert(key, merged);
}

fn is_short_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && !token.starts_with("--") && !NUMBER_RE.is_match(token)
}

fn looks_like_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && !NUMBER_RE.is_match(token)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Decimal numbers become JSON numbers when that loses nothing; everything
/// else, including integers outside the `i64` range, stays text.
fn coerce_scalar(raw: &str) -> Value {
    if NUMBER_RE.is_match(raw) {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Number(n.into());
        }
        if raw.contains('.') {
            let canonical = raw.trim_end_matches('0').trim_end_matches('.');
            let exact = raw.parse::<f64>().ok().filter(|f| f.to_string() == canonical);
            if let Some(n) = exact.and_then(Number::from_f64) {
                return Value::Number(n);
            }
        }
    }
    Value::String(raw.to_string())
}
