//! Output formatting helpers for the CLI.
//!
//! Every listing command supports three modes: bordered tables on a TTY,
//! tab-separated plain rows for scripts, and JSON.

mod json;
mod mode;
mod text;

// Re-export public API
pub use json::{books_json, events_json};
pub use mode::OutputMode;
pub use text::{books_text, categories_text, events_text, print_status, Status};
