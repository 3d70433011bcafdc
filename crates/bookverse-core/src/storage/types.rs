//! Core data types for the storage layer.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{BookVerseError, Result};

/// A catalog entry with its copy counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Catalog identifier
    pub id: i32,

    pub title: String,
    pub author: String,

    /// Topic used for browsing
    pub category: String,

    /// Copies owned by the library
    pub total_copies: u32,

    /// Copies currently on the shelf
    pub available_copies: u32,
}

impl Book {
    /// Check the copy-count invariant `available <= total`.
    pub fn check_copies(&self) -> Result<()> {
        if self.available_copies > self.total_copies {
            return Err(BookVerseError::InvariantViolation(format!(
                "book {} has {} available copies but only {} in total",
                self.id, self.available_copies, self.total_copies
            )));
        }
        Ok(())
    }

    /// True when at least one copy can be borrowed.
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}

/// Builder for adding a book to the catalog.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub category: String,
    pub copies: u32,
}

impl NewBook {
    pub fn new(
        id: i32,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
        copies: u32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            category: category.into(),
            copies,
        }
    }

    /// Materialize the book with every copy on the shelf.
    pub fn into_book(self) -> Book {
        Book {
            id: self.id,
            title: self.title,
            author: self.author,
            category: self.category,
            total_copies: self.copies,
            available_copies: self.copies,
        }
    }
}

/// Account role. Parsed case-insensitively, written in title case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Student => "Student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = BookVerseError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "student" => Ok(Role::Student),
            _ => Err(BookVerseError::InvalidInput(format!(
                "Unknown role '{}' (expected Admin or Student)",
                value
            ))),
        }
    }
}

/// A registered login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub role: Role,
    pub username: String,

    /// Stored digest: legacy hex, or `argon2:`-prefixed hex of a PHC string
    pub password_digest: String,
}

/// What a ledger row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Borrow,
    Return,
    /// Both or neither date present (only seen in hand-edited files)
    Unknown,
}

/// One row of the borrow ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowEvent {
    pub username: String,
    pub book_id: i32,
    pub borrow_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
}

impl BorrowEvent {
    pub fn borrowed(username: impl Into<String>, book_id: i32, date: NaiveDate) -> Self {
        Self {
            username: username.into(),
            book_id,
            borrow_date: Some(date),
            return_date: None,
        }
    }

    pub fn returned(username: impl Into<String>, book_id: i32, date: NaiveDate) -> Self {
        Self {
            username: username.into(),
            book_id,
            borrow_date: None,
            return_date: Some(date),
        }
    }

    pub fn action(&self) -> EventAction {
        match (self.borrow_date, self.return_date) {
            (Some(_), None) => EventAction::Borrow,
            (None, Some(_)) => EventAction::Return,
            _ => EventAction::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_starts_fully_available() {
        let book = NewBook::new(1, "Dune", "Herbert", "SciFi", 3).into_book();
        assert_eq!(book.total_copies, 3);
        assert_eq!(book.available_copies, 3);
        assert!(book.check_copies().is_ok());
    }

    #[test]
    fn test_check_copies_rejects_overflow() {
        let mut book = NewBook::new(1, "Dune", "Herbert", "SciFi", 1).into_book();
        book.available_copies = 2;
        assert!(matches!(
            book.check_copies(),
            Err(BookVerseError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("STUDENT".parse::<Role>().unwrap(), Role::Student);
        assert_eq!(Role::Student.to_string(), "Student");
        assert!("librarian".parse::<Role>().is_err());
    }

    #[test]
    fn test_event_action() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(BorrowEvent::borrowed("bob", 1, day).action(), EventAction::Borrow);
        assert_eq!(BorrowEvent::returned("bob", 1, day).action(), EventAction::Return);
        let odd = BorrowEvent {
            username: "bob".to_string(),
            book_id: 1,
            borrow_date: None,
            return_date: None,
        };
        assert_eq!(odd.action(), EventAction::Unknown);
    }
}
