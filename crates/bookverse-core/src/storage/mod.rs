//! Storage layer: one delimited text file per record type.
//!
//! - `books.txt`: `id,title,author,category,totalCopies,availableCopies`
//! - `users.txt`: `role,username,passwordDigest`
//! - `borrow.txt`: `username,bookId,borrowDateOrDash,returnDateOrDash`

pub mod books;
pub mod credentials;
pub mod ledger;
pub mod table;
pub mod types;

pub use books::{BookRepository, BOOKS_FILE};
pub use credentials::{CredentialStore, USERS_FILE};
pub use ledger::{BorrowLedger, LEDGER_FILE};
pub use table::TextTable;
pub use types::{Book, BorrowEvent, Credential, EventAction, NewBook, Role};
