//! # BookVerse Core
//!
//! Core library for BookVerse - a small library management tool that keeps
//! its catalog, accounts and circulation log in flat delimited text files.
//!
//! This crate provides the storage layer and domain rules independent of
//! the CLI interface.
//!
//! ## Architecture
//!
//! - **codec**: one record per line, comma-delimited
//! - **storage**: book repository, credential store, borrow ledger
//! - **digest**: legacy polynomial digest and Argon2id
//! - **library**: borrow/return transitions, search, integrity check
//! - **fs**: atomic file replacement and the data directory lock

pub mod codec;
pub mod digest;
pub mod error;
pub mod fs;
pub mod library;
pub mod storage;

pub use digest::DigestScheme;
pub use error::{BookVerseError, Result};
pub use library::{
    categories, search, BorrowOutcome, IntegrityReport, Library, ReturnOutcome, SearchCriterion,
};
pub use storage::{Book, BorrowEvent, Credential, EventAction, NewBook, Role};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
