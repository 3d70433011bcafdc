//! Application-level utilities for the BookVerse CLI.
//!
//! This module provides:
//! - Path resolution for the config file and data directory
//! - Password prompting and role checks
//! - The per-invocation context handed to command handlers

mod auth;
mod context;
mod resolver;

// Re-export public API
pub use auth::{parse_role, read_password};
pub use context::AppContext;
pub use resolver::{existing_config_message, resolve_config_path};
