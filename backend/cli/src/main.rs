mod demo;
mod terminal_output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use cmdshell_commands::{CommandRegistry, Shell, ShellSettings};
use cmdshell_config::{config_dir, config_file_path, load_and_prepare, ShellConfig};
use cmdshell_core::SessionContext;
use cmdshell_logging::{init_logger, EventLogger};

use terminal_output::{note_info, prompt_marker, render_response, stream_write};

#[derive(Parser)]
#[command(name = "cmdshell")]
#[command(about = "cmdshell: an embeddable command shell with prompts and passive mode")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $CMDSHELL_CONFIG_DIR/config.yaml or ~/.cmdshell/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print each response as raw JSON
    #[arg(long, global = true)]
    json: bool,

    /// Override the configured log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read command lines from stdin (default)
    Repl,
    /// Execute the given lines in order within one session
    Run {
        #[arg(required = true)]
        lines: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let config = load_and_prepare(&path).await?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level().to_string());
    init_logger(config.log_dir().map(PathBuf::as_path), &level, config.log_json());

    let registry = CommandRegistry::with_builtins(demo::commands());
    let shell = Shell::with_settings(registry, settings_from(&config));

    let session_id = Uuid::new_v4().to_string();
    info!(session = %session_id, commands = shell.registry().len(), "cmdshell starting");
    let event_log = spawn_event_logger(&shell, session_id);

    let context = match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => repl(&shell, cli.json).await?,
        Commands::Run { lines } => run_lines(&shell, &lines, cli.json).await?,
    };

    // Closing the bus lets the logger drain what is left and exit.
    drop(shell);
    let _ = event_log.await;

    if context.has_prompt() {
        warn!("Exited with a prompt still pending");
    }
    Ok(())
}

fn settings_from(config: &ShellConfig) -> ShellSettings {
    ShellSettings {
        cancel_keyword: config.cancel_keyword().to_string(),
        help_flags: config.help_flags(),
        max_passive_depth: config.max_passive_depth(),
        prompt_template: config.prompt_template().to_string(),
        event_capacity: config.event_capacity(),
    }
}

fn spawn_event_logger(shell: &Shell, session_id: String) -> JoinHandle<()> {
    let mut events = shell.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => EventLogger::log_event(&session_id, &event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event logger fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

async fn repl(shell: &Shell, json: bool) -> Result<SessionContext> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut context = SessionContext::new();
    let mut password = false;

    if !json {
        note_info("Type `help` to list commands, `exit` to quit.");
    }

    loop {
        stream_write(&mut std::io::stdout(), &prompt_marker(&context, password))?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if !context.has_prompt() && matches!(line.trim(), "exit" | "quit") {
            break;
        }

        let res = shell.execute(&line, context, None).await;
        render_response(&res, json)?;
        password = res.password;
        context = res.context;
    }
    Ok(context)
}

async fn run_lines(shell: &Shell, lines: &[String], json: bool) -> Result<SessionContext> {
    let mut context = SessionContext::new();
    for line in lines {
        let res = shell.execute(line, context, None).await;
        render_response(&res, json)?;
        context = res.context;
    }
    Ok(context)
}
