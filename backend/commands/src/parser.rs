/// Command line parsing: split a raw line into a command name and arguments.
use once_cell::sync::Lazy;
use regex::Regex;

use cmdshell_core::ShellError;

/// Lines made only of shell metacharacters, or containing parentheses, are
/// rejected before they reach the lexer.
static NOISE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[\s';"\[\]|&<>]+$|[()]"#).unwrap());

/// A tokenized command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLine {
    /// First token, lowercased. Empty for an empty line.
    pub cmd_name: String,
    /// Every token after the command name.
    pub args: Vec<String>,
}

/// True when `raw` is empty or pure shell noise.
pub fn is_invalid_input(raw: &str) -> bool {
    raw.is_empty() || NOISE_RE.is_match(raw)
}

/// Tokenize a command line honoring shell quoting and escaping.
///
/// Fails with [`ShellError::InvalidInput`] for noise lines and for lines the
/// lexer cannot split (an unterminated quote, for example).
pub fn parse(raw: &str) -> Result<ParsedLine, ShellError> {
    if raw.is_empty() {
        return Ok(ParsedLine::default());
    }
    if NOISE_RE.is_match(raw) {
        return Err(ShellError::InvalidInput);
    }

    let mut tokens = shlex::split(raw).ok_or(ShellError::InvalidInput)?;
    if tokens.is_empty() {
        return Ok(ParsedLine::default());
    }
    let cmd_name = tokens.remove(0).to_lowercase();
    Ok(ParsedLine {
        cmd_name,
        args: tokens,
    })
}
