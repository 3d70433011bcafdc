//! Book repository backed by `books.txt`.

use std::path::Path;

use tracing::info;

use super::table::TextTable;
use super::types::Book;
use crate::error::Result;
use crate::fs::StoreLock;

/// File name of the book store inside the data directory.
pub const BOOKS_FILE: &str = "books.txt";

/// Load/append/overwrite access to the book store.
#[derive(Debug, Clone)]
pub struct BookRepository {
    table: TextTable<Book>,
}

impl BookRepository {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            table: TextTable::new(data_dir, BOOKS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        self.table.path()
    }

    pub(crate) fn lock(&self) -> Result<StoreLock> {
        self.table.lock()
    }

    /// Append one book. No uniqueness check happens here.
    pub fn append(&self, book: &Book) -> Result<()> {
        self.table.append(book)
    }

    pub(crate) fn append_locked(&self, book: &Book) -> Result<()> {
        self.table.append_locked(book)
    }

    /// All books in file order; empty when the store does not exist yet.
    pub fn load_all(&self) -> Result<Vec<Book>> {
        self.table.load_all()
    }

    /// Replace the store with `books`, preserving their order.
    pub fn overwrite_all(&self, books: &[Book]) -> Result<()> {
        self.table.overwrite_all(books)
    }

    /// Remove every book carrying `id`. Returns whether any matched.
    pub fn delete_by_id(&self, id: i32) -> Result<bool> {
        let removed = self.table.update(|books| {
            let before = books.len();
            books.retain(|book| book.id != id);
            let removed = before - books.len();
            Ok((removed > 0, removed))
        })?;
        if removed > 0 {
            info!(book_id = id, rows = removed, "Deleted book");
        }
        Ok(removed > 0)
    }

    /// Locked load-mutate-overwrite over the whole book set.
    pub fn update<T>(&self, mutate: impl FnOnce(&mut Vec<Book>) -> Result<(bool, T)>) -> Result<T> {
        self.table.update(mutate)
    }

    pub(crate) fn update_locked<T>(
        &self,
        mutate: impl FnOnce(&mut Vec<Book>) -> Result<(bool, T)>,
    ) -> Result<T> {
        self.table.update_locked(mutate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::NewBook;
    use tempfile::tempdir;

    #[test]
    fn test_delete_removes_all_rows_with_id() {
        let dir = tempdir().unwrap();
        let repo = BookRepository::new(dir.path());
        repo.append(&NewBook::new(1, "A", "X", "Cat", 1).into_book()).unwrap();
        repo.append(&NewBook::new(2, "B", "X", "Cat", 1).into_book()).unwrap();
        repo.append(&NewBook::new(1, "A again", "X", "Cat", 1).into_book()).unwrap();

        assert!(repo.delete_by_id(1).unwrap());

        let remaining = repo.load_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 2);
    }

    #[test]
    fn test_delete_missing_id_reports_false() {
        let dir = tempdir().unwrap();
        let repo = BookRepository::new(dir.path());
        repo.append(&NewBook::new(2, "B", "X", "Cat", 1).into_book()).unwrap();

        assert!(!repo.delete_by_id(9).unwrap());
        assert_eq!(repo.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_ids_are_kept_by_raw_append() {
        let dir = tempdir().unwrap();
        let repo = BookRepository::new(dir.path());
        let book = NewBook::new(5, "Same", "X", "Cat", 1).into_book();
        repo.append(&book).unwrap();
        repo.append(&book).unwrap();
        assert_eq!(repo.load_all().unwrap().len(), 2);
    }
}
