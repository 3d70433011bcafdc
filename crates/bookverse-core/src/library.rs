//! Library service: borrow/return transitions over the book store and ledger.
//!
//! Nothing is cached between calls; every operation reloads from disk.
//! Borrow and return hold the data directory lock across the book rewrite
//! and the ledger append so the two files move together.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::codec::Record;
use crate::digest::DigestScheme;
use crate::error::{BookVerseError, Result};
use crate::storage::{
    Book, BookRepository, BorrowEvent, BorrowLedger, CredentialStore, NewBook, Role,
};

/// Result of a borrow request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorrowOutcome {
    /// The book after its available count was decremented
    Success(Book),
    /// No book with the id has a copy on the shelf
    NotFoundOrUnavailable,
}

/// Result of a return request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// The book after its available count was incremented
    Success(Book),
    NotFound,
}

/// How to pick books out of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriterion {
    /// Exact category name
    Category(String),
    /// 1-based position in [`categories`]
    CategoryIndex(usize),
    /// Case-sensitive substring of title, author or category
    Keyword(String),
}

/// Distinct categories in first-seen order.
pub fn categories(books: &[Book]) -> Vec<String> {
    let mut seen = HashSet::new();
    books
        .iter()
        .filter(|book| seen.insert(book.category.as_str()))
        .map(|book| book.category.clone())
        .collect()
}

/// Filter a snapshot, keeping file order.
///
/// # Errors
///
/// `InvalidInput` when a `CategoryIndex` is out of range.
pub fn search(books: &[Book], criterion: &SearchCriterion) -> Result<Vec<Book>> {
    let matches: Vec<Book> = match criterion {
        SearchCriterion::Category(name) => books
            .iter()
            .filter(|book| &book.category == name)
            .cloned()
            .collect(),
        SearchCriterion::CategoryIndex(index) => {
            let topics = categories(books);
            let name = index
                .checked_sub(1)
                .and_then(|i| topics.get(i))
                .ok_or_else(|| {
                    BookVerseError::InvalidInput(format!(
                        "Topic {} is out of range (1-{})",
                        index,
                        topics.len()
                    ))
                })?;
            return search(books, &SearchCriterion::Category(name.clone()));
        }
        SearchCriterion::Keyword(text) => books
            .iter()
            .filter(|book| {
                book.title.contains(text.as_str())
                    || book.author.contains(text.as_str())
                    || book.category.contains(text.as_str())
            })
            .cloned()
            .collect(),
    };
    Ok(matches)
}

/// Problems found by [`Library::check_integrity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    /// Book ids that appear on more than one row
    pub duplicate_book_ids: Vec<i32>,
    /// Books whose available count exceeds the total
    pub over_available: Vec<i32>,
    /// Role/username pairs registered more than once
    pub duplicate_users: Vec<(Role, String)>,
    /// Ledger rows naming a book id not in the catalog
    pub unknown_book_events: usize,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_book_ids.is_empty()
            && self.over_available.is_empty()
            && self.duplicate_users.is_empty()
            && self.unknown_book_events == 0
    }
}

/// Entry point for all catalog and circulation operations.
#[derive(Debug, Clone)]
pub struct Library {
    data_dir: PathBuf,
    books: BookRepository,
    ledger: BorrowLedger,
    credentials: CredentialStore,
}

impl Library {
    /// Open the stores in `data_dir`. Files are created on first write.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        Self::with_scheme(data_dir, DigestScheme::Legacy)
    }

    /// Like [`Library::open`], digesting new passwords with `scheme`.
    pub fn with_scheme(data_dir: impl AsRef<Path>, scheme: DigestScheme) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            data_dir: data_dir.to_path_buf(),
            books: BookRepository::new(data_dir),
            ledger: BorrowLedger::new(data_dir),
            credentials: CredentialStore::with_scheme(data_dir, scheme),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn book_repository(&self) -> &BookRepository {
        &self.books
    }

    pub fn ledger(&self) -> &BorrowLedger {
        &self.ledger
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    // --- Catalog ---

    /// Add a book with every copy available.
    ///
    /// # Errors
    ///
    /// - `DuplicateKey` if the id is already in the catalog
    /// - `InvalidInput` for an empty title or a field containing the delimiter
    pub fn add_book(&self, new_book: NewBook) -> Result<Book> {
        if new_book.title.trim().is_empty() {
            return Err(BookVerseError::InvalidInput(
                "Title must not be empty".to_string(),
            ));
        }
        let book = new_book.into_book();
        // Fail on bad fields before taking the lock.
        book.encode()?;

        let _lock = self.books.lock()?;
        if self.books.load_all()?.iter().any(|b| b.id == book.id) {
            warn!(book_id = book.id, "Rejected duplicate book id");
            return Err(BookVerseError::DuplicateKey(format!(
                "Book id {} already exists",
                book.id
            )));
        }
        self.books.append_locked(&book)?;
        info!(book_id = book.id, copies = book.total_copies, "Added book");
        Ok(book)
    }

    /// Remove every row with `id`. Returns whether anything was removed.
    pub fn delete_book(&self, id: i32) -> Result<bool> {
        self.books.delete_by_id(id)
    }

    /// All books in file order.
    pub fn books(&self) -> Result<Vec<Book>> {
        self.books.load_all()
    }

    /// Search the current catalog.
    pub fn search(&self, criterion: &SearchCriterion) -> Result<Vec<Book>> {
        search(&self.books()?, criterion)
    }

    /// Categories of the current catalog in first-seen order.
    pub fn categories(&self) -> Result<Vec<String>> {
        Ok(categories(&self.books()?))
    }

    // --- Circulation ---

    /// Borrow a copy today.
    pub fn borrow(&self, username: &str, book_id: i32) -> Result<BorrowOutcome> {
        self.borrow_on(username, book_id, today())
    }

    /// Borrow a copy of the first book with `book_id` that has one on the shelf.
    ///
    /// The ledger row is encoded before the book store is touched, so a
    /// username the ledger cannot hold fails with both files unchanged. When
    /// no copy is available neither file is touched.
    pub fn borrow_on(&self, username: &str, book_id: i32, date: NaiveDate) -> Result<BorrowOutcome> {
        let event = BorrowEvent::borrowed(username, book_id, date);
        event.encode()?;

        let _lock = self.books.lock()?;
        let borrowed = self.books.update_locked(|books| {
            let Some(book) = books
                .iter_mut()
                .find(|b| b.id == book_id && b.is_available())
            else {
                return Ok((false, None));
            };
            book.available_copies -= 1;
            Ok((true, Some(book.clone())))
        })?;

        let Some(book) = borrowed else {
            warn!(username, book_id, "Borrow refused: not found or unavailable");
            return Ok(BorrowOutcome::NotFoundOrUnavailable);
        };

        self.append_event(&event)?;
        info!(username, book_id, available = book.available_copies, "Borrowed book");
        Ok(BorrowOutcome::Success(book))
    }

    /// Return a copy today.
    pub fn return_book(&self, username: &str, book_id: i32) -> Result<ReturnOutcome> {
        self.return_on(username, book_id, today())
    }

    /// Return a copy of the first book with `book_id`.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` if every copy of that row is already on the
    /// shelf, or if the ledger shows no outstanding borrow of the book by
    /// `username`. Nothing is written in either case.
    pub fn return_on(&self, username: &str, book_id: i32, date: NaiveDate) -> Result<ReturnOutcome> {
        let event = BorrowEvent::returned(username, book_id, date);
        event.encode()?;

        let _lock = self.books.lock()?;
        let returned = self.books.update_locked(|books| {
            let Some(book) = books.iter_mut().find(|b| b.id == book_id) else {
                return Ok((false, None));
            };
            if book.available_copies >= book.total_copies {
                return Err(BookVerseError::InvariantViolation(format!(
                    "all {} copies of book {} are already returned",
                    book.total_copies, book.id
                )));
            }
            if self.ledger.outstanding_for(username, book_id)? <= 0 {
                return Err(BookVerseError::InvariantViolation(format!(
                    "{} has no outstanding borrow of book {}",
                    username, book_id
                )));
            }
            book.available_copies += 1;
            Ok((true, Some(book.clone())))
        });

        let returned = match returned {
            Ok(returned) => returned,
            Err(err) => {
                warn!(username, book_id, error = %err, "Return refused");
                return Err(err);
            }
        };

        let Some(book) = returned else {
            warn!(username, book_id, "Return refused: book not found");
            return Ok(ReturnOutcome::NotFound);
        };

        self.append_event(&event)?;
        info!(username, book_id, available = book.available_copies, "Returned book");
        Ok(ReturnOutcome::Success(book))
    }

    /// Ledger rows for `username`, oldest first.
    pub fn history(&self, username: &str) -> Result<Vec<BorrowEvent>> {
        self.ledger.list_for_user(username)
    }

    /// Every ledger row, oldest first.
    pub fn logs(&self) -> Result<Vec<BorrowEvent>> {
        self.ledger.list_all()
    }

    // --- Accounts ---

    pub fn register(&self, role: Role, username: &str, password: &str) -> Result<()> {
        self.credentials.register(role, username, password).map(|_| ())
    }

    pub fn authenticate(&self, role: Role, username: &str, password: &str) -> Result<bool> {
        self.credentials.authenticate(role, username, password)
    }

    // --- Maintenance ---

    /// Scan all three stores for data the write path would now refuse.
    pub fn check_integrity(&self) -> Result<IntegrityReport> {
        let books = self.books.load_all()?;
        let credentials = self.credentials.list()?;
        let events = self.ledger.list_all()?;

        let mut report = IntegrityReport::default();

        let mut id_counts: HashMap<i32, usize> = HashMap::new();
        for book in &books {
            *id_counts.entry(book.id).or_default() += 1;
            if book.check_copies().is_err() {
                report.over_available.push(book.id);
            }
        }
        let mut seen_ids = HashSet::new();
        for book in &books {
            if id_counts[&book.id] > 1 && seen_ids.insert(book.id) {
                report.duplicate_book_ids.push(book.id);
            }
        }

        let mut seen_users = HashSet::new();
        for credential in &credentials {
            let key = (credential.role, credential.username.clone());
            if !seen_users.insert(key.clone()) && !report.duplicate_users.contains(&key) {
                report.duplicate_users.push(key);
            }
        }

        report.unknown_book_events = events
            .iter()
            .filter(|event| !id_counts.contains_key(&event.book_id))
            .count();

        Ok(report)
    }

    fn append_event(&self, event: &BorrowEvent) -> Result<()> {
        self.ledger.append_locked(event).inspect_err(|err| {
            error!(
                username = %event.username,
                book_id = event.book_id,
                error = %err,
                "Book store updated but ledger append failed"
            );
        })
    }
}

/// Today's local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Book> {
        vec![
            NewBook::new(1, "Dune", "Frank Herbert", "SciFi", 2).into_book(),
            NewBook::new(2, "Emma", "Jane Austen", "Classics", 1).into_book(),
            NewBook::new(3, "Neuromancer", "William Gibson", "SciFi", 1).into_book(),
            NewBook::new(4, "Persuasion", "Jane Austen", "Classics", 1).into_book(),
        ]
    }

    #[test]
    fn test_categories_first_seen_order() {
        assert_eq!(categories(&catalog()), vec!["SciFi", "Classics"]);
        assert!(categories(&[]).is_empty());
    }

    #[test]
    fn test_search_by_category_keeps_file_order() {
        let ids: Vec<i32> = search(&catalog(), &SearchCriterion::Category("SciFi".into()))
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_search_by_topic_number() {
        let found = search(&catalog(), &SearchCriterion::CategoryIndex(2)).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|b| b.category == "Classics"));

        assert!(matches!(
            search(&catalog(), &SearchCriterion::CategoryIndex(0)),
            Err(BookVerseError::InvalidInput(_))
        ));
        assert!(search(&catalog(), &SearchCriterion::CategoryIndex(3)).is_err());
    }

    #[test]
    fn test_keyword_matches_any_field_case_sensitively() {
        let by_author = search(&catalog(), &SearchCriterion::Keyword("Austen".into())).unwrap();
        assert_eq!(by_author.len(), 2);

        let by_category = search(&catalog(), &SearchCriterion::Keyword("Sci".into())).unwrap();
        assert_eq!(by_category.len(), 2);

        let wrong_case = search(&catalog(), &SearchCriterion::Keyword("austen".into())).unwrap();
        assert!(wrong_case.is_empty());
    }

    #[test]
    fn test_integrity_report_clean_by_default() {
        assert!(IntegrityReport::default().is_clean());
    }
}
