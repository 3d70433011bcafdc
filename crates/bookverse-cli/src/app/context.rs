//! Application context for the BookVerse CLI.
//!
//! Bundles CLI arguments with the lazily-loaded config file.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use bookverse_core::{DigestScheme, Library, Role};

use crate::cli::{Cli, LoginArgs};
use crate::config::{BookVerseConfig, DEFAULT_DATE_FORMAT};

use super::auth::{login, Session};
use super::resolver::{load_config, resolve_data_dir};

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<BookVerseConfig>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// The config file, loaded on first use. `None` when absent.
    pub fn config(&self) -> anyhow::Result<Option<&BookVerseConfig>> {
        Ok(self
            .config
            .get_or_try_init(|| load_config(self.cli))?
            .as_ref())
    }

    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        resolve_data_dir(self.cli, self.config()?)
    }

    pub fn digest_scheme(&self) -> anyhow::Result<DigestScheme> {
        Ok(self
            .config()?
            .map(|config| config.security.digest)
            .unwrap_or_default())
    }

    pub fn date_format(&self) -> anyhow::Result<String> {
        Ok(self
            .config()?
            .map(|config| config.date_format().to_string())
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()))
    }

    /// Open the library in the resolved data directory.
    pub fn library(&self) -> anyhow::Result<Library> {
        let data_dir = self.data_dir()?;
        tracing::debug!(path = %data_dir.display(), "Opening library");
        Ok(Library::with_scheme(data_dir, self.digest_scheme()?))
    }

    /// Open the library and authenticate the caller.
    pub fn login(&self, args: &LoginArgs, required: Option<Role>) -> anyhow::Result<(Library, Session)> {
        let library = self.library()?;
        let session = login(&library, args, required)?;
        Ok((library, session))
    }
}
