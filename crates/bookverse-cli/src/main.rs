//! BookVerse CLI - a small library catalog and circulation tool
//!
//! This is the command-line interface for BookVerse. Each subcommand opens
//! the data directory, authenticates the caller where needed, and calls into
//! `bookverse-core`.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod logging;
mod output;

use clap::{CommandFactory, Parser};

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::errors::exit_code_for;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        tracing::debug!(error = ?err, "Command failed");
        eprintln!("Error: {}", err);
        std::process::exit(exit_code_for(&err));
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = AppContext::new(cli);

    match &cli.command {
        Some(Commands::Init(args)) => commands::handle_init(&ctx, args),
        Some(Commands::Register(args)) => commands::handle_register(&ctx, args),
        Some(Commands::Login(args)) => commands::handle_login(&ctx, args),
        Some(Commands::Add(args)) => commands::handle_add(&ctx, args),
        Some(Commands::Delete(args)) => commands::handle_delete(&ctx, args),
        Some(Commands::Books(args)) => commands::handle_books(&ctx, args),
        Some(Commands::Logs(args)) => commands::handle_logs(&ctx, args),
        Some(Commands::Check(args)) => commands::handle_check(&ctx, args),
        Some(Commands::Search(args)) => commands::handle_search(&ctx, args),
        Some(Commands::Categories(args)) => commands::handle_categories(&ctx, args),
        Some(Commands::Borrow(args)) => commands::handle_borrow(&ctx, args),
        Some(Commands::Return(args)) => commands::handle_return(&ctx, args),
        Some(Commands::History(args)) => commands::handle_history(&ctx, args),
        Some(Commands::Completions { shell }) => commands::handle_completions(*shell),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
