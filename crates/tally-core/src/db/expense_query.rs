//! Expense query builder for constructing dynamic SQL clauses
//!
//! Keeps the WHERE/ORDER construction in one place so listings, totals and
//! counts agree on what a date range or category constraint means.

use chrono::NaiveDate;

use crate::models::{Category, DateWindow};

/// Builder for constructing expense query constraints
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpenseQuery {
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub category: Option<Category>,
}

/// Result of building a query - contains SQL components and parameters
pub struct QueryParts {
    /// WHERE clause including "WHERE" keyword (empty if no conditions)
    pub where_clause: String,
    /// ORDER BY clause, newest date first
    pub order_clause: &'static str,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl ExpenseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive date range
    pub fn date_range(mut self, range: Option<(NaiveDate, NaiveDate)>) -> Self {
        self.date_range = range;
        self
    }

    pub fn window(self, window: DateWindow) -> Self {
        self.date_range(Some((window.start, window.end)))
    }

    /// Exact category match
    pub fn category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    /// Build the query components
    pub fn build(self) -> QueryParts {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some((from_date, to_date)) = self.date_range {
            conditions.push("date >= ? AND date <= ?");
            params.push(Box::new(from_date.to_string()));
            params.push(Box::new(to_date.to_string()));
        }

        if let Some(category) = self.category {
            conditions.push("category = ?");
            params.push(Box::new(category.as_str()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        QueryParts {
            where_clause,
            order_clause: "ORDER BY date DESC, id DESC",
            params,
        }
    }
}

impl QueryParts {
    /// Build the SELECT for full expense rows
    pub fn select_query(&self) -> String {
        format!(
            "SELECT id, amount, category, date, note, created_at FROM expenses {} {}",
            self.where_clause, self.order_clause
        )
    }

    /// Build a SUM query; NULL when nothing matches
    pub fn sum_query(&self) -> String {
        format!("SELECT SUM(amount) FROM expenses {}", self.where_clause)
    }

    /// Build a per-category SUM and COUNT, largest total first
    pub fn category_totals_query(&self) -> String {
        format!(
            "SELECT category, SUM(amount), COUNT(*) FROM expenses {} \
             GROUP BY category ORDER BY SUM(amount) DESC, category ASC",
            self.where_clause
        )
    }

    /// Build a COUNT query
    pub fn count_query(&self) -> String {
        format!("SELECT COUNT(*) FROM expenses {}", self.where_clause)
    }

    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
