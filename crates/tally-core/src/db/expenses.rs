//! Expense operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::expense_query::ExpenseQuery;
use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Category, CategoryTotal, DateWindow, Expense, NewExpense};

impl Database {
    /// Insert an expense, returning the store-assigned id
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        expense.validate()?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO expenses (amount, category, date, note) VALUES (?, ?, ?, ?)",
            params![
                expense.amount,
                expense.category.as_str(),
                expense.date.to_string(),
                expense.note,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(id, amount = expense.amount, category = %expense.category, "Inserted expense");
        Ok(id)
    }

    /// Update every mutable field of an existing expense
    pub fn update_expense(&self, expense: &Expense) -> Result<()> {
        expense.validate()?;
        let conn = self.conn()?;

        let changed = conn.execute(
            "UPDATE expenses SET amount = ?, category = ?, date = ?, note = ? WHERE id = ?",
            params![
                expense.amount,
                expense.category.as_str(),
                expense.date.to_string(),
                expense.note,
                expense.id,
            ],
        )?;

        if changed == 0 {
            return Err(Error::NotFound(format!("Expense {}", expense.id)));
        }
        debug!(id = expense.id, "Updated expense");
        Ok(())
    }

    /// Delete an expense by id
    pub fn delete_expense(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;

        if changed == 0 {
            return Err(Error::NotFound(format!("Expense {}", id)));
        }
        debug!(id, "Deleted expense");
        Ok(())
    }

    /// Get a single expense by ID
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                "SELECT id, amount, category, date, note, created_at FROM expenses WHERE id = ?",
                params![id],
                |row| Self::row_to_expense(row),
            )
            .optional()?;

        Ok(expense)
    }

    /// List expenses matching a query, newest date first
    pub fn list_expenses(&self, query: &ExpenseQuery) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let parts = query.build();

        let mut stmt = conn.prepare(&parts.select_query())?;
        let expenses = stmt
            .query_map(parts.params_refs().as_slice(), |row| {
                Self::row_to_expense(row)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    pub fn all_expenses(&self) -> Result<Vec<Expense>> {
        self.list_expenses(&ExpenseQuery::new())
    }

    /// Expenses dated within `[start, end]`
    pub fn expenses_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>> {
        self.list_expenses(&ExpenseQuery::new().date_range(Some((start, end))))
    }

    pub fn expenses_by_category(&self, category: Category) -> Result<Vec<Expense>> {
        self.list_expenses(&ExpenseQuery::new().category(Some(category)))
    }

    /// Sum of amounts dated within `[start, end]`
    ///
    /// Returns `None` when no expenses fall inside the range.
    pub fn total_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<f64>> {
        let conn = self.conn()?;
        let parts = ExpenseQuery::new().date_range(Some((start, end))).build();

        let total: Option<f64> = conn.query_row(
            &parts.sum_query(),
            parts.params_refs().as_slice(),
            |row| row.get(0),
        )?;

        Ok(total)
    }

    /// Count expenses matching a query
    pub fn count_matching(&self, query: &ExpenseQuery) -> Result<i64> {
        let conn = self.conn()?;
        let parts = query.build();

        let count: i64 = conn.query_row(
            &parts.count_query(),
            parts.params_refs().as_slice(),
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count total expenses
    pub fn count_expenses(&self) -> Result<i64> {
        self.count_matching(&ExpenseQuery::new())
    }

    /// Per-category spending within a window, largest first
    pub fn category_totals(&self, window: DateWindow) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;
        let parts = ExpenseQuery::new().window(window).build();

        let mut stmt = conn.prepare(&parts.category_totals_query())?;
        let rows = stmt
            .query_map(parts.params_refs().as_slice(), |row| {
                let category: String = row.get(0)?;
                Ok((category, row.get::<_, f64>(1)?, row.get::<_, i64>(2)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(category, amount, count)| {
                let category = category.parse().map_err(Error::InvalidData)?;
                Ok(CategoryTotal {
                    category,
                    amount,
                    count,
                })
            })
            .collect()
    }

    /// Helper to convert a row to Expense
    /// Column order: id, amount, category, date, note, created_at
    pub(crate) fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
        let category_str: String = row.get(2)?;
        let date_str: String = row.get(3)?;
        let created_at_str: String = row.get(5)?;

        let category = category_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Expense {
            id: row.get(0)?,
            amount: row.get(1)?,
            category,
            date,
            note: row.get(4)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
