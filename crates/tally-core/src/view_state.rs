//! Period and filter view state
//!
//! Holds the current time-period and filter selections, turns them into
//! repository queries, and publishes results on a `watch` channel.
//!
//! ## Ordering
//!
//! Queries may complete out of order. Each selection change bumps a generation
//! counter (one for the period list, one for the filter list); a query records
//! the generation it was issued under and its result is published only if that
//! generation is still current when it completes. Superseded results are
//! dropped and the call reports `Outcome::Discarded`.
//!
//! ## Failures
//!
//! Repository errors are returned to the caller. Published state is left as it
//! was, never replaced by a partial or empty result.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use tokio::sync::watch;

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::models::{DateWindow, Expense, ExpenseFilter, FilterKind, NewExpense, TimePeriod};
use crate::period::{compute_window, CustomWindow};
use crate::repository::ExpenseRepository;

/// What observers of the view state see
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewSnapshot {
    pub period: TimePeriod,
    /// Window the published `expenses` and `total` were computed for
    pub window: Option<DateWindow>,
    pub expenses: Vec<Expense>,
    /// Sum over `expenses`; 0 when the window is empty
    pub total: f64,
    pub filter: ExpenseFilter,
    pub filtered_expenses: Vec<Expense>,
    pub custom_window: Option<CustomWindow>,
    pub selected_expense: Option<Expense>,
}

/// Result of a query-issuing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Results were published
    Published,
    /// A newer selection superseded this one before it completed
    Discarded,
}

#[derive(Debug, Default)]
struct Selection {
    period: TimePeriod,
    custom_window: Option<CustomWindow>,
    filter: ExpenseFilter,
    last_filters: HashMap<FilterKind, ExpenseFilter>,
    period_generation: u64,
    filter_generation: u64,
}

pub struct ExpenseViewState<R: ExpenseRepository> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    selection: Mutex<Selection>,
    published: watch::Sender<ViewSnapshot>,
}

impl<R: ExpenseRepository> ExpenseViewState<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_clock(repo, Arc::new(SystemClock))
    }

    pub fn with_clock(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        let (published, _) = watch::channel(ViewSnapshot::default());
        Self {
            repo,
            clock,
            selection: Mutex::new(Selection::default()),
            published,
        }
    }

    /// Seed a previously persisted custom window
    pub fn with_custom_window(self, window: Option<CustomWindow>) -> Self {
        {
            let mut selection = self.lock();
            selection.custom_window = window;
        }
        self.published.send_modify(|s| s.custom_window = window);
        self
    }

    /// Seed remembered filters so `restore_filter` can use them
    pub fn with_remembered_filters(self, filters: impl IntoIterator<Item = ExpenseFilter>) -> Self {
        {
            let mut selection = self.lock();
            for filter in filters {
                selection.last_filters.insert(filter.kind(), filter);
            }
        }
        self
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.published.subscribe()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.published.borrow().clone()
    }

    pub fn period(&self) -> TimePeriod {
        self.lock().period
    }

    pub fn filter(&self) -> ExpenseFilter {
        self.lock().filter.clone()
    }

    /// Custom window with rollover applied for today
    pub fn custom_window(&self) -> Option<CustomWindow> {
        let today = self.clock.today();
        let mut selection = self.lock();
        let rolled = roll_custom_window(&mut selection, today);
        self.published.send_modify(|s| s.custom_window = rolled);
        rolled
    }

    /// Last successfully applied filter of a kind
    pub fn last_filter(&self, kind: FilterKind) -> Option<ExpenseFilter> {
        match kind {
            FilterKind::All => Some(ExpenseFilter::All),
            kind => self.lock().last_filters.get(&kind).cloned(),
        }
    }

    /// Active date window for a period as of today
    ///
    /// A stale custom window is rolled forward and stored before it is used.
    pub fn compute_window(&self, period: TimePeriod) -> DateWindow {
        let today = self.clock.today();
        let mut selection = self.lock();
        let custom = roll_custom_window(&mut selection, today);
        self.published.send_modify(|s| s.custom_window = custom);
        compute_window(period, today, custom)
    }

    /// Switch the active period and re-query its expenses and total
    pub async fn set_time_period(&self, period: TimePeriod) -> Result<Outcome> {
        let (generation, window) = {
            let today = self.clock.today();
            let mut selection = self.lock();
            selection.period = period;
            selection.period_generation += 1;
            let custom = roll_custom_window(&mut selection, today);
            self.published.send_modify(|s| {
                s.period = period;
                s.custom_window = custom;
            });
            (
                selection.period_generation,
                compute_window(period, today, custom),
            )
        };

        self.query_period(generation, window).await
    }

    /// Re-run the query for the active period
    pub async fn refresh(&self) -> Result<Outcome> {
        let period = self.period();
        self.set_time_period(period).await
    }

    /// Anchor the custom month window and switch to it
    pub async fn set_custom_month_start(&self, start: NaiveDate) -> Result<Outcome> {
        {
            let mut selection = self.lock();
            selection.custom_window = Some(CustomWindow::starting(start));
        }
        self.set_time_period(TimePeriod::CustomMonthly).await
    }

    /// Forget the custom window; CustomMonthly falls back to a window starting today
    pub fn clear_custom_window(&self) {
        self.lock().custom_window = None;
        self.published.send_modify(|s| s.custom_window = None);
    }

    /// Run exactly one query for `filter` and publish its result
    ///
    /// The filter becomes active, and is remembered for its kind, only when its
    /// result is published. Failed or superseded applies change nothing.
    pub async fn apply_filter(&self, filter: ExpenseFilter) -> Result<Outcome> {
        if let ExpenseFilter::ByDateRange { start, end } = filter {
            if start > end {
                return Err(Error::InvalidData(format!(
                    "Start date {} is after end date {}",
                    start, end
                )));
            }
        }

        let generation = {
            let mut selection = self.lock();
            selection.filter_generation += 1;
            selection.filter_generation
        };

        let result = match &filter {
            ExpenseFilter::All => self.repo.all_expenses().await,
            ExpenseFilter::ByDateRange { start, end } => {
                self.repo.expenses_in_range(*start, *end).await
            }
            ExpenseFilter::ByCategory { category } => {
                self.repo.expenses_by_category(*category).await
            }
        };

        // The filter only becomes active once its results are in hand
        let mut selection = self.lock();
        if selection.filter_generation != generation {
            return Ok(Outcome::Discarded);
        }
        let expenses = result?;
        if filter.kind() != FilterKind::All {
            selection.last_filters.insert(filter.kind(), filter.clone());
        }
        selection.filter = filter.clone();
        self.published.send_modify(|s| {
            s.filter = filter;
            s.filtered_expenses = expenses;
        });
        drop(selection);

        Ok(Outcome::Published)
    }

    /// Re-apply the last filter of a kind
    ///
    /// Returns `Ok(None)` when no filter of that kind has been applied yet.
    pub async fn restore_filter(&self, kind: FilterKind) -> Result<Option<Outcome>> {
        match self.last_filter(kind) {
            Some(filter) => self.apply_filter(filter).await.map(Some),
            None => Ok(None),
        }
    }

    /// Load an expense into `selected_expense`
    pub async fn load_expense(&self, id: i64) -> Result<Option<Expense>> {
        let expense = self.repo.get_by_id(id).await?;
        let selected = expense.clone();
        self.published.send_modify(|s| s.selected_expense = selected);
        Ok(expense)
    }

    /// Insert an expense and refresh the period list
    ///
    /// The write is committed before the refresh runs; a refresh error is still
    /// returned to the caller.
    pub async fn add_expense(&self, expense: NewExpense) -> Result<i64> {
        expense.validate()?;
        let id = self.repo.insert(&expense).await?;
        self.refresh().await?;
        Ok(id)
    }

    pub async fn update_expense(&self, expense: Expense) -> Result<()> {
        expense.validate()?;
        self.repo.update(&expense).await?;
        self.published.send_modify(|s| {
            if s.selected_expense.as_ref().map(|e| e.id) == Some(expense.id) {
                s.selected_expense = Some(expense.clone());
            }
        });
        self.refresh().await?;
        Ok(())
    }

    pub async fn delete_expense(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await?;
        self.published.send_modify(|s| {
            if s.selected_expense.as_ref().map(|e| e.id) == Some(id) {
                s.selected_expense = None;
            }
        });
        self.refresh().await?;
        Ok(())
    }

    async fn query_period(&self, generation: u64, window: DateWindow) -> Result<Outcome> {
        let result = tokio::try_join!(
            self.repo.expenses_in_range(window.start, window.end),
            self.repo.total_in_range(window.start, window.end),
        );

        // Check and publish under the lock so a newer selection cannot slip in between
        let selection = self.lock();
        if selection.period_generation != generation {
            return Ok(Outcome::Discarded);
        }
        let (expenses, total) = result?;
        self.published.send_modify(|s| {
            s.window = Some(window);
            s.expenses = expenses;
            s.total = total.unwrap_or(0.0);
        });
        drop(selection);

        Ok(Outcome::Published)
    }

    fn lock(&self) -> MutexGuard<'_, Selection> {
        self.selection.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn roll_custom_window(selection: &mut Selection, today: NaiveDate) -> Option<CustomWindow> {
    let rolled = selection.custom_window.map(|w| w.rolled_forward(today));
    selection.custom_window = rolled;
    rolled
}
