//! Table and plain-text output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use owo_colors::OwoColorize;

use bookverse_core::codec::PLACEHOLDER;
use bookverse_core::{Book, BorrowEvent};

use super::mode::OutputMode;

/// Status line flavor.
#[derive(Debug, Clone, Copy)]
pub enum Status {
    Ok,
    Warn,
}

fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

fn render_plain(rows: Vec<Vec<String>>) -> String {
    rows.iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn date_cell(date: Option<chrono::NaiveDate>, date_format: &str) -> String {
    date.map(|d| d.format(date_format).to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Render books as a table (pretty) or tab-separated rows (plain).
pub fn books_text(books: &[Book], mode: OutputMode) -> String {
    let rows: Vec<Vec<String>> = books
        .iter()
        .map(|book| {
            vec![
                book.id.to_string(),
                book.title.clone(),
                book.author.clone(),
                book.category.clone(),
                format!("{} / {}", book.available_copies, book.total_copies),
            ]
        })
        .collect();
    match mode {
        OutputMode::Pretty => render_table(&["ID", "Title", "Author", "Category", "Available"], rows),
        OutputMode::Plain | OutputMode::Json => render_plain(rows),
    }
}

/// Render ledger rows. The username column is omitted for personal history.
pub fn events_text(
    events: &[BorrowEvent],
    date_format: &str,
    with_user: bool,
    mode: OutputMode,
) -> String {
    let rows: Vec<Vec<String>> = events
        .iter()
        .map(|event| {
            let mut row = Vec::with_capacity(4);
            if with_user {
                row.push(event.username.clone());
            }
            row.push(event.book_id.to_string());
            row.push(date_cell(event.borrow_date, date_format));
            row.push(date_cell(event.return_date, date_format));
            row
        })
        .collect();
    match mode {
        OutputMode::Pretty => {
            let mut headers = Vec::with_capacity(4);
            if with_user {
                headers.push("Username");
            }
            headers.extend(["Book ID", "Borrow Date", "Return Date"]);
            render_table(&headers, rows)
        }
        OutputMode::Plain | OutputMode::Json => render_plain(rows),
    }
}

/// Numbered category list, as used for topic selection.
pub fn categories_text(categories: &[String]) -> String {
    categories
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print a one-line status message.
///
/// Pretty mode colors a badge; plain mode prints `key=value` lines.
pub fn print_status(mode: OutputMode, status: Status, message: &str, fields: &[(&str, String)]) {
    match mode {
        OutputMode::Pretty => {
            let badge = match status {
                Status::Ok => "OK".green().bold().to_string(),
                Status::Warn => "!!".yellow().bold().to_string(),
            };
            println!("{} {}", badge, message);
        }
        OutputMode::Plain | OutputMode::Json => {
            let label = match status {
                Status::Ok => "ok",
                Status::Warn => "warn",
            };
            println!("status={}", label);
            for (key, value) in fields {
                println!("{}={}", key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookverse_core::NewBook;
    use chrono::NaiveDate;

    #[test]
    fn test_plain_books_are_tab_separated() {
        let books = vec![NewBook::new(1, "Dune", "Herbert", "SciFi", 2).into_book()];
        assert_eq!(books_text(&books, OutputMode::Plain), "1\tDune\tHerbert\tSciFi\t2 / 2");
    }

    #[test]
    fn test_history_omits_username_and_shows_placeholder() {
        let event = BorrowEvent::returned("bob", 4, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        let text = events_text(&[event], "%Y-%m-%d", false, OutputMode::Plain);
        assert_eq!(text, "4\t-\t2024-06-02");
    }

    #[test]
    fn test_pretty_table_has_headers() {
        let books = vec![NewBook::new(1, "Dune", "Herbert", "SciFi", 2).into_book()];
        let text = books_text(&books, OutputMode::Pretty);
        assert!(text.contains("Title"));
        assert!(text.contains("Dune"));
    }

    #[test]
    fn test_categories_are_numbered() {
        let cats = vec!["SciFi".to_string(), "Art".to_string()];
        assert_eq!(categories_text(&cats), "1. SciFi\n2. Art");
    }
}
