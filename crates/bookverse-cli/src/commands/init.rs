use std::path::PathBuf;

use bookverse_core::fs::StoreLock;
use bookverse_core::DigestScheme;

use crate::app::{existing_config_message, resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_data_dir, write_config, BookVerseConfig};
use crate::errors::CliError;
use crate::output::{print_status, OutputMode, Status};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path(ctx.cli())?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(existing_config_message(&config_path)).into());
    }

    let digest = match args.digest.as_deref() {
        Some(value) => value
            .parse::<DigestScheme>()
            .map_err(|e| CliError::invalid_input(e.to_string()))?,
        None => DigestScheme::default(),
    };

    let data_dir = match (args.path.as_deref(), ctx.cli().data_dir.as_deref()) {
        (Some(path), _) | (None, Some(path)) => PathBuf::from(path),
        (None, None) => default_data_dir()?,
    };

    // Taking the lock once creates the directory and its lock file.
    drop(StoreLock::acquire(&data_dir)?);

    let config = BookVerseConfig::new(data_dir.clone(), digest);
    write_config(&config_path, &config)?;
    tracing::info!(config = %config_path.display(), data_dir = %data_dir.display(), "Initialized");

    if !ctx.quiet() {
        print_status(
            OutputMode::from_env(false, None)?,
            Status::Ok,
            &format!("Initialized BookVerse at {}", data_dir.display()),
            &[
                ("data_dir", data_dir.display().to_string()),
                ("config", config_path.display().to_string()),
            ],
        );
    }
    Ok(())
}
