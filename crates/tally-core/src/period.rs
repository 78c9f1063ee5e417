//! Period window computation
//!
//! Translates a `TimePeriod` and "today" into the inclusive date window used
//! for the headline total and the default expense list:
//! - Daily: today only
//! - Monthly: the calendar month containing today
//! - CustomMonthly: a month-long window starting on a user-chosen date,
//!   rolled forward until it contains today

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{DateWindow, TimePeriod};

/// A month-long window anchored on a user-chosen start date
///
/// `end` is always `start + 1 month - 1 day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl CustomWindow {
    /// Window beginning on `start`
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            end: month_window_end(start),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Advance contiguous month-long windows until `today` is covered
    ///
    /// Each step starts the next window the day after the previous end.
    /// Windows that already cover `today` (or lie in the future) come back unchanged.
    pub fn rolled_forward(&self, today: NaiveDate) -> Self {
        let mut window = *self;
        while window.is_stale(today) {
            let Some(next_start) = window.end.succ_opt() else {
                break;
            };
            window = Self::starting(next_start);
        }
        window
    }

    /// Whether `today` is past the end of this window
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        today > self.end
    }

    pub fn as_date_window(&self) -> DateWindow {
        DateWindow::new(self.start, self.end)
    }
}

/// Compute the active date window for a period
pub fn compute_window(
    period: TimePeriod,
    today: NaiveDate,
    custom: Option<CustomWindow>,
) -> DateWindow {
    match period {
        TimePeriod::Daily => DateWindow::single_day(today),
        TimePeriod::Monthly => {
            DateWindow::new(first_day_of_month(today), last_day_of_month(today))
        }
        TimePeriod::CustomMonthly => match custom {
            Some(window) => window.rolled_forward(today).as_date_window(),
            None => DateWindow::new(today, month_window_end(today)),
        },
    }
}

/// `start + 1 month - 1 day`, clamping to the end of shorter months
pub fn month_window_end(start: NaiveDate) -> NaiveDate {
    start
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    first_day_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
