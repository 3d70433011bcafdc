//! Path resolution for the config file and data directory.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_data_dir, read_config, BookVerseConfig};

/// Resolve the config file path: `--config` / `BOOKVERSE_CONFIG`, then XDG.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(value) = cli.config.as_deref() {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config file if there is one.
pub fn load_config(cli: &Cli) -> anyhow::Result<Option<BookVerseConfig>> {
    let config_path = resolve_config_path(cli)?;
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        return Ok(None);
    }
    read_config(&config_path).map(Some)
}

/// Resolve the data directory: `--data-dir` / `BOOKVERSE_DATA_DIR`, then
/// the config file, then the XDG data dir.
pub fn resolve_data_dir(cli: &Cli, config: Option<&BookVerseConfig>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.data_dir.as_deref() {
        return Ok(PathBuf::from(path));
    }
    if let Some(config) = config {
        return Ok(PathBuf::from(&config.storage.data_dir));
    }
    default_data_dir()
}

/// Error message when the config file already exists.
pub fn existing_config_message(path: &Path) -> String {
    format!(
        "Config already exists at {}\n\nUse --force to overwrite it.",
        path.display()
    )
}
