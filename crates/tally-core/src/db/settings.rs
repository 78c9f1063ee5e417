//! Persisted view settings
//!
//! Period and filter selections are transient. The custom month window is the
//! one piece of view state that outlives a session; the CLI also keeps the last
//! applied filter of each kind here so it can be restored later.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{ExpenseFilter, FilterKind};
use crate::period::CustomWindow;

const CUSTOM_START_KEY: &str = "custom_window.start";
const CUSTOM_END_KEY: &str = "custom_window.end";

fn filter_key(kind: FilterKind) -> String {
    format!("last_filter.{}", kind.as_str())
}

impl Database {
    /// Read a raw setting value
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM view_settings WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Insert or replace a raw setting value
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO view_settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    pub fn delete_setting(&self, key: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM view_settings WHERE key = ?", params![key])?;
        Ok(())
    }

    /// Persist the custom month window
    pub fn save_custom_window(&self, window: &CustomWindow) -> Result<()> {
        self.set_setting(CUSTOM_START_KEY, &window.start().to_string())?;
        self.set_setting(CUSTOM_END_KEY, &window.end().to_string())?;
        debug!(start = %window.start(), end = %window.end(), "Saved custom window");
        Ok(())
    }

    /// Load the custom month window, if one has been set
    ///
    /// Only the start is authoritative; the end is re-derived so a hand-edited
    /// row cannot break the one-month invariant.
    pub fn load_custom_window(&self) -> Result<Option<CustomWindow>> {
        let Some(start) = self.get_setting(CUSTOM_START_KEY)? else {
            return Ok(None);
        };
        let start = NaiveDate::parse_from_str(&start, "%Y-%m-%d").map_err(|e| {
            Error::InvalidData(format!("Stored custom window start '{}': {}", start, e))
        })?;
        Ok(Some(CustomWindow::starting(start)))
    }

    pub fn clear_custom_window(&self) -> Result<()> {
        self.delete_setting(CUSTOM_START_KEY)?;
        self.delete_setting(CUSTOM_END_KEY)?;
        Ok(())
    }

    /// Remember the last applied filter of its kind
    pub fn save_last_filter(&self, filter: &ExpenseFilter) -> Result<()> {
        let json = serde_json::to_string(filter)?;
        self.set_setting(&filter_key(filter.kind()), &json)
    }

    /// Last applied filter of a kind, if any
    pub fn load_last_filter(&self, kind: FilterKind) -> Result<Option<ExpenseFilter>> {
        match self.get_setting(&filter_key(kind))? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Every remembered filter
    pub fn load_last_filters(&self) -> Result<Vec<ExpenseFilter>> {
        let mut filters = Vec::new();
        for kind in [FilterKind::All, FilterKind::DateRange, FilterKind::Category] {
            if let Some(filter) = self.load_last_filter(kind)? {
                filters.push(filter);
            }
        }
        Ok(filters)
    }
}
