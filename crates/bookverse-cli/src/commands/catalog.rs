use bookverse_core::{NewBook, Role, SearchCriterion};

use crate::app::AppContext;
use crate::cli::{AddArgs, BookIdArgs, ListArgs, SearchArgs};
use crate::errors::CliError;
use crate::output::{books_json, books_text, categories_text, print_status, OutputMode, Status};

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let (library, _session) = ctx.login(&args.login, Some(Role::Admin))?;

    let book = library.add_book(NewBook::new(
        args.id,
        args.title.clone(),
        args.author.clone(),
        args.category.clone(),
        args.copies,
    ))?;

    if !ctx.quiet() {
        print_status(
            OutputMode::from_env(false, None)?,
            Status::Ok,
            &format!("Book added successfully: {} ({})", book.title, book.id),
            &[("id", book.id.to_string())],
        );
    }
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, args: &BookIdArgs) -> anyhow::Result<()> {
    let (library, _session) = ctx.login(&args.login, Some(Role::Admin))?;

    if !library.delete_book(args.id)? {
        return Err(CliError::not_found(
            format!("Book {} not found.", args.id),
            "Hint: run `bookverse books` to see catalog ids.",
        )
        .into());
    }

    if !ctx.quiet() {
        print_status(
            OutputMode::from_env(false, None)?,
            Status::Ok,
            &format!("Book {} deleted successfully.", args.id),
            &[("deleted", args.id.to_string())],
        );
    }
    Ok(())
}

pub fn handle_books(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let (library, _session) = ctx.login(&args.login, Some(Role::Admin))?;
    let books = library.books()?;
    print_books(ctx, args, &books, "No books in the library.")
}

pub fn handle_search(ctx: &AppContext, args: &SearchArgs) -> anyhow::Result<()> {
    let (library, _session) = ctx.login(&args.list.login, None)?;

    let criterion = if let Some(ref category) = args.category {
        SearchCriterion::Category(category.clone())
    } else if let Some(topic) = args.topic {
        SearchCriterion::CategoryIndex(topic)
    } else if let Some(ref keyword) = args.keyword {
        SearchCriterion::Keyword(keyword.clone())
    } else {
        return Err(CliError::invalid_input("Give --category, --topic or --keyword").into());
    };

    let books = library.search(&criterion)?;
    print_books(ctx, &args.list, &books, "No matching books found.")
}

pub fn handle_categories(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let (library, _session) = ctx.login(&args.login, None)?;
    let categories = library.categories()?;

    let mode = OutputMode::from_env(args.json, args.format.as_deref())?;
    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else if categories.is_empty() {
        if !ctx.quiet() {
            println!("No books in the library.");
        }
    } else {
        println!("{}", categories_text(&categories));
    }
    Ok(())
}

fn print_books(
    ctx: &AppContext,
    args: &ListArgs,
    books: &[bookverse_core::Book],
    empty_message: &str,
) -> anyhow::Result<()> {
    let mode = OutputMode::from_env(args.json, args.format.as_deref())?;
    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&books_json(books)?)?);
        return Ok(());
    }
    if books.is_empty() {
        if !ctx.quiet() {
            println!("{}", empty_message);
        }
        return Ok(());
    }
    println!("{}", books_text(books, mode));
    Ok(())
}
