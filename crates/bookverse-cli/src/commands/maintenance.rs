use bookverse_core::Role;

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::errors::CliError;
use crate::output::{print_status, OutputMode, Status};

pub fn handle_check(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let (library, _session) = ctx.login(&args.login, Some(Role::Admin))?;
    let report = library.check_integrity()?;
    let mode = OutputMode::from_env(args.json, args.format.as_deref())?;

    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_clean() {
        if !ctx.quiet() {
            print_status(mode, Status::Ok, "Integrity check passed", &[]);
        }
    } else {
        let duplicate_users: Vec<String> = report
            .duplicate_users
            .iter()
            .map(|(role, user)| format!("{}:{}", role, user))
            .collect();
        print_status(
            mode,
            Status::Warn,
            "Integrity check found problems",
            &[
                ("duplicate_book_ids", join(&report.duplicate_book_ids)),
                ("over_available", join(&report.over_available)),
                ("duplicate_users", duplicate_users.join(",")),
                ("unknown_book_events", report.unknown_book_events.to_string()),
            ],
        );
        if mode == OutputMode::Pretty {
            eprintln!("- duplicate book ids: {}", join(&report.duplicate_book_ids));
            eprintln!("- available > total: {}", join(&report.over_available));
            eprintln!("- duplicate accounts: {}", duplicate_users.join(", "));
            eprintln!("- ledger rows for unknown books: {}", report.unknown_book_events);
        }
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::IntegrityFailed("Integrity check failed".to_string()).into())
    }
}

fn join(ids: &[i32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
