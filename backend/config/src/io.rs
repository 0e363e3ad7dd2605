//! Config file location and loading.

use crate::schema::ShellConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the config directory.
/// Priority: `CMDSHELL_CONFIG_DIR` env > `~/.cmdshell/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CMDSHELL_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".cmdshell"),
        None => PathBuf::from(".cmdshell"),
    }
}

pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Read the raw YAML tree. A missing file reads as an empty mapping.
pub async fn load_raw(path: &Path) -> Result<serde_json::Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(serde_json::Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value: serde_json::Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    // An empty file parses as null.
    Ok(if value.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        value
    })
}

/// Parse a config from disk without env substitution or defaults.
pub async fn load_config(path: &Path) -> Result<ShellConfig> {
    let value = load_raw(path).await?;
    serde_json::from_value(value)
        .with_context(|| format!("Invalid config structure at: {}", path.display()))
}

/// Write a config as YAML, creating parent directories.
pub async fn write_config(config: &ShellConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }
    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    fs::write(path, yaml)
        .await
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    info!(path = %path.display(), "Wrote config");
    Ok(())
}
