//! Repository facade over the expense store
//!
//! The view state only talks to an `ExpenseRepository`, so it can be driven by
//! the SQLite-backed implementation in production and by scripted
//! repositories in tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::db::Database;
use crate::error::Result;
use crate::models::{Category, Expense, NewExpense};

/// Async access to stored expenses
///
/// List queries return expenses newest date first.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn all_expenses(&self) -> Result<Vec<Expense>>;

    /// Expenses dated within `[start, end]`, inclusive
    async fn expenses_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>>;

    /// Expenses whose category matches exactly
    async fn expenses_by_category(&self, category: Category) -> Result<Vec<Expense>>;

    /// Sum of amounts in `[start, end]`; `None` when nothing matches
    async fn total_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<f64>>;

    async fn insert(&self, expense: &NewExpense) -> Result<i64>;

    async fn update(&self, expense: &Expense) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Expense>>;
}

/// `ExpenseRepository` backed by the SQLite `Database`
///
/// rusqlite is blocking, so every call runs on tokio's blocking pool.
#[derive(Clone)]
pub struct SqliteRepository {
    db: Database,
}

impl SqliteRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn run<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
    {
        let db = self.db.clone();
        debug!(op, "Repository query");
        tokio::task::spawn_blocking(move || f(&db)).await?
    }
}

#[async_trait]
impl ExpenseRepository for SqliteRepository {
    async fn all_expenses(&self) -> Result<Vec<Expense>> {
        self.run("all_expenses", |db| db.all_expenses()).await
    }

    async fn expenses_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>> {
        self.run("expenses_in_range", move |db| db.expenses_in_range(start, end))
            .await
    }

    async fn expenses_by_category(&self, category: Category) -> Result<Vec<Expense>> {
        self.run("expenses_by_category", move |db| {
            db.expenses_by_category(category)
        })
        .await
    }

    async fn total_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<f64>> {
        self.run("total_in_range", move |db| db.total_in_range(start, end))
            .await
    }

    async fn insert(&self, expense: &NewExpense) -> Result<i64> {
        let expense = expense.clone();
        self.run("insert", move |db| db.insert_expense(&expense)).await
    }

    async fn update(&self, expense: &Expense) -> Result<()> {
        let expense = expense.clone();
        self.run("update", move |db| db.update_expense(&expense)).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.run("delete", move |db| db.delete_expense(id)).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Expense>> {
        self.run("get_by_id", move |db| db.get_expense(id)).await
    }
}
