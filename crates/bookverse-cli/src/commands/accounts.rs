use bookverse_core::BookVerseError;

use crate::app::{parse_role, read_password, AppContext};
use crate::cli::{LoginArgs, RegisterArgs};
use crate::errors::CliError;
use crate::output::{print_status, OutputMode, Status};

pub fn handle_register(ctx: &AppContext, args: &RegisterArgs) -> anyhow::Result<()> {
    let role = parse_role(&args.login.role)?;
    let password = read_password(args.login.no_input, true)?;
    let library = ctx.library()?;

    match library.register(role, &args.login.user, &password) {
        Ok(()) => {}
        Err(BookVerseError::DuplicateKey(message)) => {
            return Err(CliError::invalid_input(format!(
                "{}\nHint: pick another username or log in instead.",
                message
            ))
            .into());
        }
        Err(err) => return Err(err.into()),
    }

    if !ctx.quiet() {
        print_status(
            OutputMode::from_env(false, None)?,
            Status::Ok,
            "User registered successfully! You can now log in.",
            &[("role", role.to_string()), ("user", args.login.user.clone())],
        );
    }
    Ok(())
}

pub fn handle_login(ctx: &AppContext, args: &LoginArgs) -> anyhow::Result<()> {
    let (_library, session) = ctx.login(args, None)?;
    if !ctx.quiet() {
        print_status(
            OutputMode::from_env(false, None)?,
            Status::Ok,
            &format!("Welcome, {} ({})", session.username, session.role),
            &[("role", session.role.to_string()), ("user", session.username.clone())],
        );
    }
    Ok(())
}
