//! Line codec for the delimited text stores.
//!
//! Each record is one line of comma-separated fields with no header, no
//! quoting and no escaping. Decoding is purely positional, so a field that
//! contains the delimiter cannot be stored; [`Record::encode`] refuses it
//! instead of writing a row that would shift every later column.

use chrono::NaiveDate;

use crate::error::{BookVerseError, Result};
use crate::storage::types::{Book, BorrowEvent, Credential, Role};

/// Field separator.
pub const DELIMITER: char = ',';

/// Placeholder written for an absent date.
pub const PLACEHOLDER: &str = "-";

/// Date format used in the ledger.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A type that maps to exactly one store line.
pub trait Record: Sized {
    /// Store name used in error messages.
    const STORE: &'static str;

    /// Number of fields per line.
    const FIELDS: usize;

    /// Serialize to a line without the trailing newline.
    fn encode(&self) -> Result<String>;

    /// Parse one line (without newline).
    fn decode(line: &str) -> Result<Self>;
}

fn check_text(store: &'static str, name: &str, value: &str) -> Result<()> {
    if value.contains(DELIMITER) || value.contains('\n') || value.contains('\r') {
        return Err(BookVerseError::InvalidInput(format!(
            "{} {} must not contain ',' or line breaks: {:?}",
            store, name, value
        )));
    }
    Ok(())
}

fn split_fields<R: Record>(line: &str) -> Result<Vec<&str>> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != R::FIELDS {
        return Err(BookVerseError::parse(
            R::STORE,
            format!("expected {} fields, found {}", R::FIELDS, fields.len()),
        ));
    }
    Ok(fields)
}

/// Numbers must be in the form `encode` writes: no sign, no leading zeros.
fn parse_number<R: Record, T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr + std::fmt::Display,
{
    let invalid = || {
        BookVerseError::parse(R::STORE, format!("{} is not a valid number: {:?}", name, value))
    };
    let number: T = value.parse().map_err(|_| invalid())?;
    if number.to_string() != value {
        return Err(invalid());
    }
    Ok(number)
}

fn parse_date<R: Record>(name: &str, value: &str) -> Result<Option<NaiveDate>> {
    if value == PLACEHOLDER {
        return Ok(None);
    }
    let invalid = || {
        BookVerseError::parse(
            R::STORE,
            format!("{} must be YYYY-MM-DD or '-': {:?}", name, value),
        )
    };
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())?;
    // chrono accepts unpadded fields; only the zero-padded form is stored.
    if date.format(DATE_FORMAT).to_string() != value {
        return Err(invalid());
    }
    Ok(Some(date))
}

fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format(DATE_FORMAT).to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

impl Record for Book {
    const STORE: &'static str = "books";
    const FIELDS: usize = 6;

    fn encode(&self) -> Result<String> {
        check_text(Self::STORE, "title", &self.title)?;
        check_text(Self::STORE, "author", &self.author)?;
        check_text(Self::STORE, "category", &self.category)?;
        Ok(format!(
            "{},{},{},{},{},{}",
            self.id,
            self.title,
            self.author,
            self.category,
            self.total_copies,
            self.available_copies
        ))
    }

    fn decode(line: &str) -> Result<Self> {
        let fields = split_fields::<Self>(line)?;
        Ok(Book {
            id: parse_number::<Self, _>("id", fields[0])?,
            title: fields[1].to_string(),
            author: fields[2].to_string(),
            category: fields[3].to_string(),
            total_copies: parse_number::<Self, _>("totalCopies", fields[4])?,
            available_copies: parse_number::<Self, _>("availableCopies", fields[5])?,
        })
    }
}

impl Record for Credential {
    const STORE: &'static str = "users";
    const FIELDS: usize = 3;

    fn encode(&self) -> Result<String> {
        check_text(Self::STORE, "username", &self.username)?;
        check_text(Self::STORE, "digest", &self.password_digest)?;
        Ok(format!(
            "{},{},{}",
            self.role, self.username, self.password_digest
        ))
    }

    fn decode(line: &str) -> Result<Self> {
        let fields = split_fields::<Self>(line)?;
        let role: Role = fields[0].parse().map_err(|_| {
            BookVerseError::parse(Self::STORE, format!("unknown role {:?}", fields[0]))
        })?;
        Ok(Credential {
            role,
            username: fields[1].to_string(),
            password_digest: fields[2].to_string(),
        })
    }
}

impl Record for BorrowEvent {
    const STORE: &'static str = "borrow";
    const FIELDS: usize = 4;

    fn encode(&self) -> Result<String> {
        check_text(Self::STORE, "username", &self.username)?;
        Ok(format!(
            "{},{},{},{}",
            self.username,
            self.book_id,
            format_date(self.borrow_date),
            format_date(self.return_date)
        ))
    }

    fn decode(line: &str) -> Result<Self> {
        let fields = split_fields::<Self>(line)?;
        Ok(BorrowEvent {
            username: fields[0].to_string(),
            book_id: parse_number::<Self, _>("bookId", fields[1])?,
            borrow_date: parse_date::<Self>("borrowDate", fields[2])?,
            return_date: parse_date::<Self>("returnDate", fields[3])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_line_round_trip() {
        let line = "7,The Rust Book,Klabnik,Programming,4,2";
        let book = Book::decode(line).unwrap();
        assert_eq!(book.id, 7);
        assert_eq!(book.category, "Programming");
        assert_eq!(book.available_copies, 2);
        assert_eq!(book.encode().unwrap(), line);
    }

    #[test]
    fn test_book_rejects_non_numeric_copies() {
        let err = Book::decode("1,Title,Author,Cat,two,2").unwrap_err();
        assert!(matches!(err, BookVerseError::Parse { store: "books", .. }));
    }

    #[test]
    fn test_book_rejects_negative_copies() {
        assert!(Book::decode("1,Title,Author,Cat,2,-1").is_err());
    }

    #[test]
    fn test_field_count_mismatch() {
        let err = Book::decode("1,Title,Author,Cat,2").unwrap_err();
        assert!(err.to_string().contains("expected 6 fields, found 5"));
        // A comma inside a title shifts the columns and is caught the same way.
        assert!(Book::decode("1,Hello, World,Author,Cat,2,2").is_err());
    }

    #[test]
    fn test_encode_refuses_delimiter() {
        let book = Book {
            id: 1,
            title: "Hello, World".to_string(),
            author: "A".to_string(),
            category: "C".to_string(),
            total_copies: 1,
            available_copies: 1,
        };
        assert!(matches!(
            book.encode(),
            Err(BookVerseError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_credential_accepts_any_role_casing() {
        let cred = Credential::decode("admin,alice,1a2b").unwrap();
        assert_eq!(cred.role, Role::Admin);
        assert_eq!(cred.username, "alice");
        // Written back in canonical casing.
        assert_eq!(cred.encode().unwrap(), "Admin,alice,1a2b");
    }

    #[test]
    fn test_credential_unknown_role() {
        assert!(matches!(
            Credential::decode("Guest,alice,1a2b"),
            Err(BookVerseError::Parse { .. })
        ));
    }

    #[test]
    fn test_borrow_event_placeholders() {
        let borrow = BorrowEvent::decode("bob,1,2024-01-05,-").unwrap();
        assert_eq!(borrow.borrow_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(borrow.return_date, None);
        assert_eq!(borrow.encode().unwrap(), "bob,1,2024-01-05,-");

        let ret = BorrowEvent::decode("bob,1,-,2024-01-09").unwrap();
        assert_eq!(ret.borrow_date, None);
        assert_eq!(ret.encode().unwrap(), "bob,1,-,2024-01-09");
    }

    #[test]
    fn test_borrow_event_bad_date() {
        assert!(BorrowEvent::decode("bob,1,05/01/2024,-").is_err());
    }

    #[test]
    fn test_non_canonical_fields_rejected() {
        assert!(Book::decode("1,T,A,C,+2,2").is_err());
        assert!(Book::decode("01,T,A,C,2,2").is_err());
        assert!(Book::decode("1,T,A,C, 2,2").is_err());
        assert!(BorrowEvent::decode("bob,1,2024-1-5,-").is_err());
        assert!(BorrowEvent::decode("bob,1,-,2024-01-5").is_err());
        assert!(Book::decode("-3,T,A,C,2,2").is_ok());
    }
}
