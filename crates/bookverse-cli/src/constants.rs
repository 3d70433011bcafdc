//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Book, account or config not found; book has no copy available.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid input, duplicate key, or a rejected copy-count change.
    pub const INVALID_INPUT: i32 = 4;

    /// Wrong credentials or wrong role for the command.
    pub const AUTH_FAILED: i32 = 5;

    /// Integrity check found problems.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Environment variable holding the password for non-interactive use.
pub const PASSWORD_ENV: &str = "BOOKVERSE_PASSWORD";

/// Environment variable read by the log filter.
pub const LOG_ENV: &str = "BOOKVERSE_LOG";
