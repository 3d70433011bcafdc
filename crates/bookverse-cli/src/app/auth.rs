//! Credential prompting and role checks.

use std::io::IsTerminal;

use dialoguer::Password;

use bookverse_core::{Library, Role};

use crate::cli::LoginArgs;
use crate::constants::PASSWORD_ENV;
use crate::errors::CliError;

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct Session {
    pub role: Role,
    pub username: String,
}

/// Parse the role given on the command line.
pub fn parse_role(value: &str) -> anyhow::Result<Role> {
    value
        .parse::<Role>()
        .map_err(|e| anyhow::Error::new(CliError::invalid_input(e.to_string())))
}

/// Read the password from `BOOKVERSE_PASSWORD`, or prompt on a TTY.
pub fn read_password(no_input: bool, confirm: bool) -> anyhow::Result<String> {
    if let Ok(value) = std::env::var(PASSWORD_ENV) {
        if !value.is_empty() {
            return Ok(value);
        }
    }
    if no_input || !std::io::stdin().is_terminal() {
        return Err(CliError::invalid_input(format!(
            "No password provided and no TTY available. Set {}.",
            PASSWORD_ENV
        ))
        .into());
    }
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Authenticate `login`, optionally requiring a specific role.
pub fn login(library: &Library, login: &LoginArgs, required: Option<Role>) -> anyhow::Result<Session> {
    let role = parse_role(&login.role)?;
    if let Some(required) = required {
        if role != required {
            return Err(CliError::auth_failed_with_hint(
                format!("This command requires the {} role", required),
                format!("Hint: run it with --role {}", required),
            )
            .into());
        }
    }

    let password = read_password(login.no_input, false)?;
    if !library.authenticate(role, &login.user, &password)? {
        tracing::warn!(%role, user = %login.user, "Login failed");
        return Err(CliError::auth_failed("Login failed. Please check your credentials.").into());
    }

    Ok(Session {
        role,
        username: login.user.clone(),
    })
}
