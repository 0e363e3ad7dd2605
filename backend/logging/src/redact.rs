//! Log Redaction Layer
//!
//! Scrubs tokens and secret-looking flags from text, and masks password
//! options before they reach a log.

use cmdshell_core::Options;
use regex::Regex;
use std::sync::LazyLock;

pub const REDACTED: &str = "[REDACTED]";

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9]{32,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});
static SECRET_FLAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(--?(?:password|passwd|pass|secret|token))(=|\s+)\S+").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    SECRET_FLAG_RE
        .replace_all(&redacted, format!("${{1}}${{2}}{REDACTED}").as_str())
        .into_owned()
}

/// Copy of `options` with every key in `sensitive` masked.
pub fn redact_options(options: &Options, sensitive: &[String]) -> Options {
    let mut masked = options.clone();
    for key in sensitive {
        if masked.contains(key) {
            masked.insert(key.as_str(), REDACTED);
        }
    }
    masked
}
