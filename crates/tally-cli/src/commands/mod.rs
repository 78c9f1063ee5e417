//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, categories) and shared utilities (open_db, open_view)
//! - `expenses` - Expense commands (add, edit, delete, show, list)
//! - `filter` - Filter commands (all, range, category, last)
//! - `period` - Custom month window commands
//! - `report` - Monthly report export

pub mod core;
pub mod expenses;
pub mod filter;
pub mod period;
pub mod report;

// Re-export command functions for main.rs
pub use self::core::*;
pub use expenses::*;
pub use filter::*;
pub use period::*;
pub use report::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
