//! Core command implementations (init, categories) and shared utilities

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tally_core::{Category, Clock, Database, ExpenseViewState, SqliteRepository};
use tracing::debug;

/// View state over the SQLite store, as used by every command
pub type View = ExpenseViewState<SqliteRepository>;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Build the view state, restoring the persisted custom window and remembered filters
pub fn open_view(db: Database, clock: Arc<dyn Clock>) -> Result<View> {
    let custom_window = db
        .load_custom_window()
        .context("Failed to load custom window")?;
    let filters = db
        .load_last_filters()
        .context("Failed to load remembered filters")?;
    debug!(
        custom_window = custom_window.is_some(),
        filters = filters.len(),
        "Restored view settings"
    );

    Ok(
        ExpenseViewState::with_clock(Arc::new(SqliteRepository::new(db)), clock)
            .with_custom_window(custom_window)
            .with_remembered_filters(filters),
    )
}

/// Write the (possibly rolled-forward) custom window back to the store
pub fn persist_custom_window(view: &View) -> Result<()> {
    let db = view.repository().database();
    let saved = match view.custom_window() {
        Some(window) => db.save_custom_window(&window),
        None => db.clear_custom_window(),
    };
    saved.context("Failed to save custom window")
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    println!("🔧 Initialized database at {}", db.path());
    let count = db.count_expenses().context("Failed to read expenses")?;
    println!("   {} expenses recorded", count);

    if !db.is_encrypted() {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: tally add --amount 250 --category food");
    println!("  2. See today's spending: tally list");

    Ok(())
}

pub fn cmd_categories() -> Result<()> {
    println!();
    println!("🏷️  Categories");
    println!("   ─────────────────────────────");
    for category in Category::ALL {
        println!("   {}", category);
    }
    Ok(())
}
