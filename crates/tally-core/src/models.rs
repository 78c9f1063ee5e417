//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// New expense for insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
}

impl NewExpense {
    pub fn new(amount: f64, category: Category, date: NaiveDate) -> Self {
        Self {
            amount,
            category,
            date,
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Reject amounts the store would refuse
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)
    }
}

impl Expense {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(Error::InvalidData(format!(
            "Amount must be a number, got {}",
            amount
        )));
    }
    if amount < 0.0 {
        return Err(Error::InvalidData(format!(
            "Amount must not be negative, got {:.2}",
            amount
        )));
    }
    Ok(())
}

/// Fixed set of expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    Food,
    Transportation,
    Shopping,
    Bills,
    Entertainment,
    Health,
    Education,
    Others,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Food,
        Self::Transportation,
        Self::Shopping,
        Self::Bills,
        Self::Entertainment,
        Self::Health,
        Self::Education,
        Self::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Shopping => "Shopping",
            Self::Bills => "Bills",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Education => "Education",
            Self::Others => "Others",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "transportation" | "transport" => Ok(Self::Transportation),
            "shopping" => Ok(Self::Shopping),
            "bills" => Ok(Self::Bills),
            "entertainment" => Ok(Self::Entertainment),
            "health" => Ok(Self::Health),
            "education" => Ok(Self::Education),
            "others" | "other" => Ok(Self::Others),
            _ => Err(format!(
                "Unknown category: {}. Available: {}",
                s,
                Self::ALL.map(|c| c.as_str()).join(", ")
            )),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Time period driving the headline total and default list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    #[default]
    Daily,
    Monthly,
    CustomMonthly,
}

impl TimePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::CustomMonthly => "custom",
        }
    }
}

impl std::str::FromStr for TimePeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "monthly" | "month" => Ok(Self::Monthly),
            "custom" | "custom_monthly" | "custom-monthly" => Ok(Self::CustomMonthly),
            _ => Err(format!(
                "Unknown period: {}. Available: daily, monthly, custom",
                s
            )),
        }
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// On-demand filter for the dedicated filter view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpenseFilter {
    #[default]
    All,
    ByDateRange {
        start: NaiveDate,
        end: NaiveDate,
    },
    ByCategory {
        category: Category,
    },
}

impl ExpenseFilter {
    /// Build a date range filter, rejecting inverted ranges
    pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidData(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }
        Ok(Self::ByDateRange { start, end })
    }

    pub fn category(category: Category) -> Self {
        Self::ByCategory { category }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Self::All => FilterKind::All,
            Self::ByDateRange { .. } => FilterKind::DateRange,
            Self::ByCategory { .. } => FilterKind::Category,
        }
    }
}

impl std::fmt::Display for ExpenseFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all expenses"),
            Self::ByDateRange { start, end } => write!(f, "{} to {}", start, end),
            Self::ByCategory { category } => write!(f, "category {}", category),
        }
    }
}

/// Tag of an `ExpenseFilter`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    All,
    DateRange,
    Category,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::DateRange => "range",
            Self::Category => "category",
        }
    }
}

impl std::str::FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "range" | "date_range" | "date-range" => Ok(Self::DateRange),
            "category" => Ok(Self::Category),
            _ => Err(format!(
                "Unknown filter kind: {}. Available: all, range, category",
                s
            )),
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending for one category within a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: f64,
    pub count: i64,
}
