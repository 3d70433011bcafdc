use bookverse_core::{BorrowEvent, BorrowOutcome, ReturnOutcome, Role};

use crate::app::AppContext;
use crate::cli::{BookIdArgs, ListArgs};
use crate::errors::CliError;
use crate::output::{events_json, events_text, print_status, OutputMode, Status};

pub fn handle_borrow(ctx: &AppContext, args: &BookIdArgs) -> anyhow::Result<()> {
    let (library, session) = ctx.login(&args.login, Some(Role::Student))?;

    match library.borrow(&session.username, args.id)? {
        BorrowOutcome::Success(book) => {
            if !ctx.quiet() {
                print_status(
                    OutputMode::from_env(false, None)?,
                    Status::Ok,
                    &format!(
                        "Book borrowed successfully: {} ({} of {} left)",
                        book.title, book.available_copies, book.total_copies
                    ),
                    &[
                        ("id", book.id.to_string()),
                        ("available", book.available_copies.to_string()),
                    ],
                );
            }
            Ok(())
        }
        BorrowOutcome::NotFoundOrUnavailable => Err(CliError::not_found(
            format!("Book {} not available or not found.", args.id),
            "Hint: run `bookverse search` to find available titles.",
        )
        .into()),
    }
}

pub fn handle_return(ctx: &AppContext, args: &BookIdArgs) -> anyhow::Result<()> {
    let (library, session) = ctx.login(&args.login, Some(Role::Student))?;

    match library.return_book(&session.username, args.id)? {
        ReturnOutcome::Success(book) => {
            if !ctx.quiet() {
                print_status(
                    OutputMode::from_env(false, None)?,
                    Status::Ok,
                    &format!("Book returned successfully: {}", book.title),
                    &[
                        ("id", book.id.to_string()),
                        ("available", book.available_copies.to_string()),
                    ],
                );
            }
            Ok(())
        }
        ReturnOutcome::NotFound => Err(CliError::not_found(
            format!("Book {} not found.", args.id),
            "Hint: run `bookverse history` to see what you borrowed.",
        )
        .into()),
    }
}

pub fn handle_history(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let (library, session) = ctx.login(&args.login, Some(Role::Student))?;
    let events = library.history(&session.username)?;
    print_events(ctx, args, &events, false, "No borrowing history.")
}

pub fn handle_logs(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let (library, _session) = ctx.login(&args.login, Some(Role::Admin))?;
    let events = library.logs()?;
    print_events(ctx, args, &events, true, "No borrow logs.")
}

fn print_events(
    ctx: &AppContext,
    args: &ListArgs,
    events: &[BorrowEvent],
    with_user: bool,
    empty_message: &str,
) -> anyhow::Result<()> {
    let date_format = ctx.date_format()?;
    let mode = OutputMode::from_env(args.json, args.format.as_deref())?;
    if mode == OutputMode::Json {
        println!(
            "{}",
            serde_json::to_string_pretty(&events_json(events, &date_format))?
        );
        return Ok(());
    }
    if events.is_empty() {
        if !ctx.quiet() {
            println!("{}", empty_message);
        }
        return Ok(());
    }
    println!("{}", events_text(events, &date_format, with_user, mode));
    Ok(())
}
