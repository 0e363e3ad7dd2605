//! `cmdshell-config`: configuration for hosts embedding the shell.
//!
//! Provides:
//! - Typed config schema (engine tunables, logging)
//! - YAML read/write
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation report

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{contains_env_var_reference, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::{LoggingSection, ShellConfig, ShellSection};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load, substitute env vars, apply defaults and validate a config file.
///
/// This is the main entry point for loading a config at runtime. Warnings
/// are logged; errors are logged and fail the load.
pub async fn load_and_prepare(path: &Path) -> Result<ShellConfig> {
    let value = io::load_raw(path).await?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    prepare(value)
}

fn prepare(value: serde_json::Value) -> Result<ShellConfig> {
    let config: ShellConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn loads_yaml_with_env_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(
            &path,
            "shell:\n  cancelKeyword: stop\n  maxPassiveDepth: 2\nlogging:\n  level: debug\n",
        )
        .await
        .unwrap();

        let config = load_and_prepare(&path).await.unwrap();
        assert_eq!(config.cancel_keyword(), "stop");
        assert_eq!(config.max_passive_depth(), 2);
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.help_flags(), vec!["?", "help"]);
    }

    #[test]
    fn invalid_config_fails() {
        let value = serde_json::json!({"logging": {"level": "${LEVEL}"}});
        let env = HashMap::from([("LEVEL".to_string(), "chatty".to_string())]);
        let value = resolve_env_vars_with(&value, &env).unwrap();
        let err = prepare(value).unwrap_err().to_string();
        assert!(err.contains("logging.level"));
    }
}
