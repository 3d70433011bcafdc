//! Borrow ledger backed by `borrow.txt`.
//!
//! The ledger is a log of actions. A return is a new row, never an edit of
//! the borrow it answers.

use std::path::Path;

use chrono::NaiveDate;

use super::table::TextTable;
use super::types::{BorrowEvent, EventAction};
use crate::error::Result;

/// File name of the borrow ledger inside the data directory.
pub const LEDGER_FILE: &str = "borrow.txt";

#[derive(Debug, Clone)]
pub struct BorrowLedger {
    table: TextTable<BorrowEvent>,
}

impl BorrowLedger {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            table: TextTable::new(data_dir, LEDGER_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        self.table.path()
    }

    pub fn append_borrow(&self, username: &str, book_id: i32, date: NaiveDate) -> Result<()> {
        self.table
            .append(&BorrowEvent::borrowed(username, book_id, date))
    }

    pub fn append_return(&self, username: &str, book_id: i32, date: NaiveDate) -> Result<()> {
        self.table
            .append(&BorrowEvent::returned(username, book_id, date))
    }

    pub(crate) fn append_locked(&self, event: &BorrowEvent) -> Result<()> {
        self.table.append_locked(event)
    }

    /// Every event, oldest first.
    pub fn list_all(&self) -> Result<Vec<BorrowEvent>> {
        self.table.load_all()
    }

    /// Events recorded for `username` (exact match), oldest first.
    pub fn list_for_user(&self, username: &str) -> Result<Vec<BorrowEvent>> {
        let mut events = self.list_all()?;
        events.retain(|event| event.username == username);
        Ok(events)
    }

    /// Borrows minus returns recorded for one user and book.
    pub fn outstanding_for(&self, username: &str, book_id: i32) -> Result<i64> {
        let events = self.list_for_user(username)?;
        Ok(events
            .iter()
            .filter(|event| event.book_id == book_id)
            .map(|event| match event.action() {
                EventAction::Borrow => 1,
                EventAction::Return => -1,
                EventAction::Unknown => 0,
            })
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_return_appends_new_row() {
        let dir = tempdir().unwrap();
        let ledger = BorrowLedger::new(dir.path());
        ledger.append_borrow("bob", 1, day(1)).unwrap();
        ledger.append_return("bob", 1, day(4)).unwrap();

        assert_eq!(
            fs::read_to_string(ledger.path()).unwrap(),
            "bob,1,2024-05-01,-\nbob,1,-,2024-05-04\n"
        );
    }

    #[test]
    fn test_list_for_user_keeps_order() {
        let dir = tempdir().unwrap();
        let ledger = BorrowLedger::new(dir.path());
        ledger.append_borrow("bob", 2, day(1)).unwrap();
        ledger.append_borrow("carol", 2, day(2)).unwrap();
        ledger.append_borrow("bob", 3, day(3)).unwrap();

        let ids: Vec<i32> = ledger
            .list_for_user("bob")
            .unwrap()
            .iter()
            .map(|e| e.book_id)
            .collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(ledger.list_for_user("Bob").unwrap().is_empty());
    }

    #[test]
    fn test_outstanding_counts() {
        let dir = tempdir().unwrap();
        let ledger = BorrowLedger::new(dir.path());
        ledger.append_borrow("bob", 1, day(1)).unwrap();
        ledger.append_borrow("bob", 1, day(2)).unwrap();
        ledger.append_return("bob", 1, day(3)).unwrap();
        ledger.append_borrow("bob", 2, day(3)).unwrap();

        assert_eq!(ledger.outstanding_for("bob", 1).unwrap(), 1);
        assert_eq!(ledger.outstanding_for("bob", 2).unwrap(), 1);
        assert_eq!(ledger.outstanding_for("carol", 1).unwrap(), 0);
    }
}
