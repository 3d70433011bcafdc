use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bookverse_core::DigestScheme;

use crate::errors::CliError;

/// Default date format for rendered ledger rows.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize, Deserialize)]
pub struct BookVerseConfig {
    pub storage: StorageSection,
    #[serde(default)]
    pub security: SecuritySection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StorageSection {
    pub data_dir: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SecuritySection {
    /// Digest applied to newly registered passwords
    #[serde(default)]
    pub digest: DigestScheme,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UiSection {
    pub date_format: Option<String>,
}

impl BookVerseConfig {
    pub fn new(data_dir: PathBuf, digest: DigestScheme) -> Self {
        Self {
            storage: StorageSection {
                data_dir: data_dir.to_string_lossy().to_string(),
            },
            security: SecuritySection { digest },
            ui: UiSection {
                date_format: Some(DEFAULT_DATE_FORMAT.to_string()),
            },
        }
    }

    pub fn date_format(&self) -> &str {
        self.ui.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
    }

    /// Reject values that would fail at render time.
    pub fn validate(&self) -> Result<(), CliError> {
        validate_date_format(self.date_format())
    }
}

/// A date format must parse and must only use date fields.
pub fn validate_date_format(format: &str) -> Result<(), CliError> {
    let invalid = || {
        CliError::invalid_input(format!(
            "Invalid [ui] date_format '{}': use strftime date specifiers such as %Y-%m-%d",
            format
        ))
    };
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }
    // Time fields parse but cannot be rendered for a bare date.
    let mut rendered = String::new();
    write!(rendered, "{}", NaiveDate::MIN.format(format)).map_err(|_| invalid())?;
    Ok(())
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    xdg_data_dir()
}

pub fn read_config(path: &Path) -> anyhow::Result<BookVerseConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    let config: BookVerseConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))?;
    config.validate()?;
    Ok(config)
}

pub fn write_config(path: &Path, config: &BookVerseConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("bookverse"));
        }
    }
    Ok(home_dir()?.join(".config").join("bookverse"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("bookverse"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("bookverse"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: BookVerseConfig = toml::from_str("[storage]\ndata_dir = \"/tmp/bv\"\n").unwrap();
        assert_eq!(config.storage.data_dir, "/tmp/bv");
        assert_eq!(config.security.digest, DigestScheme::Legacy);
        assert_eq!(config.date_format(), DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn test_bad_date_format_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[storage]\ndata_dir = \"/tmp/bv\"\n\n[ui]\ndate_format = \"%Q\"\n",
        )
        .unwrap();

        let err = read_config(&path).unwrap_err();
        let cli_err = err.downcast_ref::<CliError>().expect("typed error");
        assert_eq!(cli_err.exit_code(), crate::constants::exit_codes::INVALID_INPUT);
    }

    #[test]
    fn test_date_format_validation() {
        assert!(validate_date_format("%d/%m/%Y").is_ok());
        assert!(validate_date_format("%e %B %Y").is_ok());
        assert!(validate_date_format("%Q").is_err());
        assert!(validate_date_format("%Y-%m-%d %H:%M").is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = BookVerseConfig::new(PathBuf::from("/srv/library"), DigestScheme::Argon2);

        write_config(&path, &config).unwrap();
        let loaded = read_config(&path).unwrap();

        assert_eq!(loaded.storage.data_dir, "/srv/library");
        assert_eq!(loaded.security.digest, DigestScheme::Argon2);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("digest = \"argon2\""));
    }
}
