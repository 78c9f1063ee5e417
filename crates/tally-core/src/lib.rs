//! Tally Core Library
//!
//! Shared functionality for the Tally personal expense tracker:
//! - Database access and migrations
//! - Async repository facade over the store
//! - Period windows (daily, calendar month, custom month with rollover)
//! - View state for the period list, totals and filters
//! - Monthly report export

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod period;
pub mod report;
pub mod repository;
pub mod view_state;

/// Scripted in-memory repository for tests
#[cfg(test)]
pub mod test_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use db::{Database, ExpenseQuery};
pub use error::{Error, Result};
pub use models::{
    Category, CategoryTotal, DateWindow, Expense, ExpenseFilter, FilterKind, NewExpense,
    TimePeriod,
};
pub use period::{compute_window, CustomWindow};
pub use report::{MonthlyReport, ReportFormat, YearMonth};
pub use repository::{ExpenseRepository, SqliteRepository};
pub use view_state::{ExpenseViewState, Outcome, ViewSnapshot};
