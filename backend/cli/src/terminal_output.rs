//! Terminal output: ANSI notes and response rendering.

use std::io::Write;

use cmdshell_core::{LogLevel, Response, SessionContext};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const RED: &str = "\x1b[31m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM").map(|t| t != "dumb").unwrap_or(false))
}

/// Print a formatted INFO note to stdout.
pub fn note_info(msg: &str) {
    if supports_color() {
        println!("{CYAN}{BOLD}ℹ{RESET} {msg}");
    } else {
        println!("INFO: {msg}");
    }
}

/// Print a formatted WARNING note.
pub fn note_warn(msg: &str) {
    if supports_color() {
        println!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        println!("WARN: {msg}");
    }
}

/// Print a formatted ERROR note.
pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

/// Print every log entry of a response, or the raw response as JSON.
pub fn render_response(response: &Response, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(response)?);
        return Ok(());
    }
    for entry in &response.log {
        match entry.level {
            // Command output is printed bare so `help` listings line up.
            LogLevel::Info => println!("{}", entry.message),
            LogLevel::Warn => note_warn(&entry.message),
            LogLevel::Error => note_error(&entry.message),
        }
    }
    Ok(())
}

/// The REPL input marker for the session's current state.
pub fn prompt_marker(context: &SessionContext, password: bool) -> String {
    let base = match (&context.prompt, context.passive_prefix()) {
        (Some(pending), _) => format!("{}?", pending.option),
        (None, Some(prefix)) => format!("{prefix}>"),
        (None, None) => ">".to_string(),
    };
    if password {
        format!("{base} (input is not hidden) ")
    } else {
        format!("{base} ")
    }
}

/// Write `text` without a newline and flush.
pub fn stream_write(writer: &mut impl Write, text: &str) -> std::io::Result<()> {
    writer.write_all(text.as_bytes())?;
    writer.flush()
}
