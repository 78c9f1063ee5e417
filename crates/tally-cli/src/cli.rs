//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tally_core::{Category, FilterKind, ReportFormat, TimePeriod, YearMonth};

/// Tally - Track where your money goes
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to the configured database_path)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TALLY_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Record an expense
    Add {
        /// Amount spent (non-negative)
        #[arg(short, long, value_parser = parse_amount)]
        amount: f64,

        /// Category: food, transportation, shopping, bills, entertainment, health, education, others
        #[arg(short, long)]
        category: Category,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Change fields of an existing expense
    Edit {
        /// Expense ID
        id: i64,

        #[arg(short, long, value_parser = parse_amount)]
        amount: Option<f64>,

        #[arg(short, long)]
        category: Option<Category>,

        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Replacement note (use "" to clear)
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },

    /// Show a single expense
    Show {
        /// Expense ID
        id: i64,
    },

    /// List expenses for a time period with its total
    List {
        /// Period: daily, monthly, custom (defaults to the configured default_period)
        #[arg(short, long)]
        period: Option<TimePeriod>,
    },

    /// Manage the custom month window
    Period {
        #[command(subcommand)]
        action: PeriodAction,
    },

    /// Browse expenses by date range or category
    Filter {
        #[command(subcommand)]
        action: FilterAction,
    },

    /// Export a monthly report
    Report {
        /// Month to report on (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<YearMonth>,

        /// Output format: text, csv, json, pdf
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,

        /// Output directory (defaults to the configured report_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List the expense categories
    Categories,
}

#[derive(Subcommand)]
pub enum PeriodAction {
    /// Start a one-month window on the given date and switch to it
    Custom {
        /// First day of the window (YYYY-MM-DD)
        #[arg(short, long)]
        start: NaiveDate,
    },

    /// Show the current custom window
    Show,

    /// Forget the custom window
    Clear,
}

#[derive(Subcommand)]
pub enum FilterAction {
    /// Every expense
    All,

    /// Expenses dated within an inclusive range
    Range {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },

    /// Expenses in one category
    Category {
        /// Category name
        category: Category,
    },

    /// Re-apply the last filter of a kind: all, range, category
    Last {
        kind: FilterKind,
    },
}

/// Parse an amount argument, rejecting negatives and non-numbers
pub fn parse_amount(s: &str) -> Result<f64, String> {
    let amount: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid amount", s))?;
    if !amount.is_finite() {
        return Err(format!("'{}' is not a valid amount", s));
    }
    if amount < 0.0 {
        return Err("Amount must not be negative".to_string());
    }
    Ok(amount)
}
