//! Command handlers, one module per area.

mod accounts;
mod catalog;
mod circulation;
mod init;
mod maintenance;
mod misc;

pub use accounts::{handle_login, handle_register};
pub use catalog::{handle_add, handle_books, handle_categories, handle_delete, handle_search};
pub use circulation::{handle_borrow, handle_history, handle_logs, handle_return};
pub use init::handle_init;
pub use maintenance::handle_check;
pub use misc::handle_completions;
