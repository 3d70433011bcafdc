//! Error types for BookVerse core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to exit codes and user-friendly messages.

use thiserror::Error;

/// Result type alias for BookVerse operations.
pub type Result<T> = std::result::Result<T, BookVerseError>;

/// Core error type for BookVerse operations.
#[derive(Debug, Error)]
pub enum BookVerseError {
    /// A stored line could not be decoded
    #[error("Parse error in {store} line {line}: {message}")]
    Parse {
        store: &'static str,
        line: usize,
        message: String,
    },

    /// Store unreadable or unwritable
    #[error("Storage error: {0}")]
    Io(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Copy counts would leave the valid range
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Key already present in a store
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Password hashing error
    #[error("Digest error: {0}")]
    Digest(String),
}

impl BookVerseError {
    /// Build a parse error that is not yet tied to a line.
    ///
    /// Stores re-tag it with the line number via [`BookVerseError::at_line`].
    pub(crate) fn parse(store: &'static str, message: impl Into<String>) -> Self {
        BookVerseError::Parse {
            store,
            line: 0,
            message: message.into(),
        }
    }

    /// Attach a 1-based line number to a parse error. Other variants pass through.
    pub(crate) fn at_line(self, line_number: usize) -> Self {
        match self {
            BookVerseError::Parse { store, message, .. } => BookVerseError::Parse {
                store,
                line: line_number,
                message,
            },
            other => other,
        }
    }
}

impl From<std::io::Error> for BookVerseError {
    fn from(err: std::io::Error) -> Self {
        BookVerseError::Io(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for BookVerseError {
    fn from(err: argon2::password_hash::Error) -> Self {
        BookVerseError::Digest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_line_tags_parse_errors() {
        let err = BookVerseError::parse("books", "bad id").at_line(7);
        assert_eq!(err.to_string(), "Parse error in books line 7: bad id");
    }

    #[test]
    fn test_at_line_leaves_other_errors() {
        let err = BookVerseError::NotFound("book 3".to_string()).at_line(2);
        assert!(matches!(err, BookVerseError::NotFound(_)));
    }
}
