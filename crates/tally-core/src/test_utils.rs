//! Test utilities for tally-core
//!
//! A scripted in-memory `ExpenseRepository` that records every call, can be
//! switched into a failing mode, and can hold a list query open so tests can
//! control the order in which concurrent queries complete.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::models::{Category, Expense, NewExpense};
use crate::repository::ExpenseRepository;

/// A repository call as observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum RepoCall {
    All,
    Range(NaiveDate, NaiveDate),
    Category(Category),
    Total(NaiveDate, NaiveDate),
    Insert,
    Update(i64),
    Delete(i64),
    Get(i64),
}

/// Handle for a held list query
///
/// `entered` fires once the query is in flight; the query completes after
/// `release` is sent (or dropped).
pub struct QueryGate {
    pub entered: oneshot::Receiver<()>,
    pub release: oneshot::Sender<()>,
}

#[derive(Default)]
struct MockState {
    expenses: Vec<Expense>,
    next_id: i64,
    failing: bool,
    calls: Vec<RepoCall>,
    gate: Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>,
}

#[derive(Default)]
pub struct MockRepository {
    state: Mutex<MockState>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an expense directly, bypassing call recording
    pub fn seed(&self, amount: f64, category: Category, date: NaiveDate) -> i64 {
        let mut state = self.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.expenses.push(Expense {
            id,
            amount,
            category,
            date,
            note: String::new(),
            created_at: Utc::now(),
        });
        id
    }

    /// Make every subsequent call fail with a database error
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    pub fn calls(&self) -> Vec<RepoCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Hold the next list query open until the returned gate is released
    pub fn hold_next_list_query(&self) -> QueryGate {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.lock().gate = Some((entered_tx, release_rx));
        QueryGate {
            entered: entered_rx,
            release: release_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: RepoCall) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.failing {
            return Err(Error::Database(rusqlite::Error::InvalidQuery));
        }
        Ok(())
    }

    async fn list<F>(&self, call: RepoCall, keep: F) -> Result<Vec<Expense>>
    where
        F: Fn(&Expense) -> bool,
    {
        self.record(call)?;

        let gate = self.lock().gate.take();
        if let Some((entered, release)) = gate {
            let _ = entered.send(());
            let _ = release.await;
        }

        let state = self.lock();
        if state.failing {
            return Err(Error::Database(rusqlite::Error::InvalidQuery));
        }
        let mut result: Vec<Expense> = state.expenses.iter().filter(|e| keep(e)).cloned().collect();
        result.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(result)
    }
}

#[async_trait]
impl ExpenseRepository for MockRepository {
    async fn all_expenses(&self) -> Result<Vec<Expense>> {
        self.list(RepoCall::All, |_| true).await
    }

    async fn expenses_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>> {
        self.list(RepoCall::Range(start, end), |e| e.date >= start && e.date <= end)
            .await
    }

    async fn expenses_by_category(&self, category: Category) -> Result<Vec<Expense>> {
        self.list(RepoCall::Category(category), |e| e.category == category)
            .await
    }

    async fn total_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<f64>> {
        self.record(RepoCall::Total(start, end))?;
        let state = self.lock();
        let amounts: Vec<f64> = state
            .expenses
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .map(|e| e.amount)
            .collect();
        if amounts.is_empty() {
            Ok(None)
        } else {
            Ok(Some(amounts.iter().sum()))
        }
    }

    async fn insert(&self, expense: &NewExpense) -> Result<i64> {
        self.record(RepoCall::Insert)?;
        expense.validate()?;
        let mut state = self.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.expenses.push(Expense {
            id,
            amount: expense.amount,
            category: expense.category,
            date: expense.date,
            note: expense.note.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn update(&self, expense: &Expense) -> Result<()> {
        self.record(RepoCall::Update(expense.id))?;
        let mut state = self.lock();
        match state.expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => {
                *existing = expense.clone();
                Ok(())
            }
            None => Err(Error::NotFound(format!("Expense {}", expense.id))),
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.record(RepoCall::Delete(id))?;
        let mut state = self.lock();
        let before = state.expenses.len();
        state.expenses.retain(|e| e.id != id);
        if state.expenses.len() == before {
            return Err(Error::NotFound(format!("Expense {}", id)));
        }
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Expense>> {
        self.record(RepoCall::Get(id))?;
        Ok(self.lock().expenses.iter().find(|e| e.id == id).cloned())
    }
}
