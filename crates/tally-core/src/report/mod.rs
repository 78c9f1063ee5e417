//! Monthly expense report
//!
//! Builds a report for one calendar month and renders it as an aligned text
//! table, CSV, JSON, or a PDF document. Amounts are shown in rupees with
//! Indian digit grouping.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, CategoryTotal, DateWindow, Expense};
use crate::period::{first_day_of_month, last_day_of_month};

mod pdf;

/// A calendar month, parsed from `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(Error::InvalidData(format!(
                "Invalid month: {}-{:02}",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Validated on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn window(&self) -> DateWindow {
        let first = self.first_day();
        DateWindow::new(first_day_of_month(first), last_day_of_month(first))
    }

    /// "January 2024"
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidData(format!("Invalid month '{}', expected YYYY-MM", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Csv,
    Json,
    Pdf,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Pdf => "pdf",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pdf" => Ok(Self::Pdf),
            _ => Err(format!(
                "Unknown report format: {} (expected text, csv, json, or pdf)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: Category,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub month: YearMonth,
    pub title: String,
    pub total: f64,
    pub rows: Vec<ReportRow>,
    /// Per-category spending, largest first
    pub categories: Vec<CategoryTotal>,
}

impl MonthlyReport {
    /// Build a report from the expenses recorded for `month` and the store's
    /// per-category totals over the same month
    pub fn build(
        month: YearMonth,
        expenses: &[Expense],
        mut categories: Vec<CategoryTotal>,
    ) -> Self {
        let mut rows: Vec<ReportRow> = expenses
            .iter()
            .map(|e| ReportRow {
                date: e.date,
                amount: e.amount,
                category: e.category,
                note: e.note.clone(),
            })
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));

        categories.sort_by(|a, b| b.amount.total_cmp(&a.amount));

        Self {
            month,
            title: format!("Expense Report - {}", month.label()),
            total: expenses.iter().map(|e| e.amount).sum(),
            rows,
            categories,
        }
    }

    /// `expense_report_YYYY_MM.<ext>`
    pub fn file_name(&self, format: ReportFormat) -> String {
        format!(
            "expense_report_{:04}_{:02}.{}",
            self.month.year(),
            self.month.month(),
            format.extension()
        )
    }

    /// Render the report as the bytes of a file in `format`
    pub fn render(&self, format: ReportFormat) -> Result<Vec<u8>> {
        match format {
            ReportFormat::Text => Ok(self.render_text().into_bytes()),
            ReportFormat::Csv => self.render_csv(),
            ReportFormat::Json => Ok(serde_json::to_vec_pretty(self)?),
            ReportFormat::Pdf => pdf::render(self),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&"=".repeat(self.title.chars().count()));
        out.push_str("\n\n");
        out.push_str(&format!(
            "Total Expenses: {}\n\n",
            format_currency(self.total)
        ));

        out.push_str(&format!(
            "{:<12} {:>14}  {:<15} {}\n",
            "Date", "Amount", "Category", "Note"
        ));
        out.push_str(&format!("{}\n", "-".repeat(60)));
        for row in &self.rows {
            out.push_str(&format!(
                "{:<12} {:>14}  {:<15} {}\n",
                format_date(row.date),
                format_currency(row.amount),
                row.category.as_str(),
                row.note
            ));
        }

        out.push_str("\nCategory Summary\n");
        out.push_str(&format!("{}\n", "-".repeat(31)));
        for summary in &self.categories {
            out.push_str(&format!(
                "{:<15} {:>15}\n",
                summary.category.as_str(),
                format_currency(summary.amount)
            ));
        }
        out
    }

    fn render_csv(&self) -> Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["Date", "Amount", "Category", "Note"])?;
        for row in &self.rows {
            wtr.write_record([
                row.date.to_string(),
                format!("{:.2}", row.amount),
                row.category.as_str().to_string(),
                row.note.clone(),
            ])?;
        }
        wtr.write_record([
            "Total".to_string(),
            format!("{:.2}", self.total),
            String::new(),
            String::new(),
        ])?;

        wtr.into_inner()
            .map_err(|e| Error::Report(format!("Failed to flush CSV: {}", e.error())))
    }
}

/// Render `report` into `dir` and return the written path
pub fn write_report(dir: &Path, report: &MonthlyReport, format: ReportFormat) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(report.file_name(format));
    fs::write(&path, report.render(format)?)?;
    debug!(
        path = %path.display(),
        rows = report.rows.len(),
        format = format.extension(),
        "Wrote report"
    );
    Ok(path)
}

/// `05 Jan 2024`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// Rupee amount with Indian digit grouping: `₹1,23,456.00`
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = if int_part.len() <= 3 {
        int_part.to_string()
    } else {
        let (head, last3) = int_part.split_at(int_part.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (h, t) = rest.split_at(rest.len() - 2);
            groups.push(t);
            rest = h;
        }
        groups.push(rest);
        groups.reverse();
        format!("{},{}", groups.join(","), last3)
    };

    format!("{}₹{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(id: i64, amount: f64, category: Category, on: NaiveDate, note: &str) -> Expense {
        Expense {
            id,
            amount,
            category,
            date: on,
            note: note.to_string(),
            created_at: Utc::now(),
        }
    }

    fn sample() -> MonthlyReport {
        let month: YearMonth = "2024-01".parse().unwrap();
        MonthlyReport::build(
            month,
            &[
                expense(1, 120.0, Category::Food, date(2024, 1, 3), "Lunch"),
                expense(2, 1500.0, Category::Bills, date(2024, 1, 20), "Electricity"),
                expense(3, 80.5, Category::Food, date(2024, 1, 12), ""),
            ],
            vec![total(Category::Food, 200.5, 2), total(Category::Bills, 1500.0, 1)],
        )
    }

    fn total(category: Category, amount: f64, count: i64) -> CategoryTotal {
        CategoryTotal {
            category,
            amount,
            count,
        }
    }

    fn rendered(report: &MonthlyReport, format: ReportFormat) -> String {
        String::from_utf8(report.render(format).unwrap()).unwrap()
    }

    #[test]
    fn test_format_currency_indian_grouping() {
        assert_eq!(format_currency(0.0), "₹0.00");
        assert_eq!(format_currency(999.5), "₹999.50");
        assert_eq!(format_currency(1000.0), "₹1,000.00");
        assert_eq!(format_currency(123456.0), "₹1,23,456.00");
        assert_eq!(format_currency(12345678.9), "₹1,23,45,678.90");
        assert_eq!(format_currency(-1500.0), "-₹1,500.00");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date(2024, 1, 5)), "05 Jan 2024");
    }

    #[test]
    fn test_year_month_parse() {
        let month: YearMonth = "2024-02".parse().unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 2);
        assert_eq!(month.label(), "February 2024");
        assert_eq!(month.to_string(), "2024-02");
        assert_eq!(
            month.window(),
            DateWindow::new(date(2024, 2, 1), date(2024, 2, 29))
        );

        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024".parse::<YearMonth>().is_err());
        assert!("abcd-01".parse::<YearMonth>().is_err());
        assert_eq!(YearMonth::of(date(2023, 12, 31)).to_string(), "2023-12");
    }

    #[test]
    fn test_report_format_parse() {
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("CSV".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("PDF".parse::<ReportFormat>().unwrap(), ReportFormat::Pdf);
        assert!("docx".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_build_report() {
        let report = sample();
        assert_eq!(report.title, "Expense Report - January 2024");
        assert_eq!(report.total, 1700.5);

        let dates: Vec<_> = report.rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 20), date(2024, 1, 12), date(2024, 1, 3)]);

        assert_eq!(report.categories.len(), 2);
        assert_eq!(report.categories[0].category, Category::Bills);
        assert_eq!(report.categories[0].amount, 1500.0);
        assert_eq!(report.categories[1].category, Category::Food);
        assert_eq!(report.categories[1].amount, 200.5);
    }

    #[test]
    fn test_empty_report() {
        let report = MonthlyReport::build(YearMonth::new(2024, 6).unwrap(), &[], Vec::new());
        assert_eq!(report.total, 0.0);
        assert!(report.rows.is_empty());
        assert!(report.categories.is_empty());
        assert!(rendered(&report, ReportFormat::Text).contains("₹0.00"));
    }

    #[test]
    fn test_file_name() {
        let report = sample();
        assert_eq!(report.file_name(ReportFormat::Text), "expense_report_2024_01.txt");
        assert_eq!(report.file_name(ReportFormat::Csv), "expense_report_2024_01.csv");
        assert_eq!(report.file_name(ReportFormat::Json), "expense_report_2024_01.json");
        assert_eq!(report.file_name(ReportFormat::Pdf), "expense_report_2024_01.pdf");
    }

    #[test]
    fn test_render_text() {
        let text = rendered(&sample(), ReportFormat::Text);
        assert!(text.starts_with("Expense Report - January 2024"));
        assert!(text.contains("Total Expenses: ₹1,700.50"));
        assert!(text.contains("20 Jan 2024"));
        assert!(text.contains("Electricity"));
        assert!(text.contains("Category Summary"));

        // Newest first
        let bills = text.find("Electricity").unwrap();
        let lunch = text.find("Lunch").unwrap();
        assert!(bills < lunch);
    }

    #[test]
    fn test_render_csv() {
        let csv = rendered(&sample(), ReportFormat::Csv);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Date,Amount,Category,Note");
        assert_eq!(lines[1], "2024-01-20,1500.00,Bills,Electricity");
        assert_eq!(lines[3], "2024-01-03,120.00,Food,Lunch");
        assert_eq!(lines[4], "Total,1700.50,,");
    }

    #[test]
    fn test_render_json() {
        let json = rendered(&sample(), ReportFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Expense Report - January 2024");
        assert_eq!(value["total"], 1700.5);
        assert_eq!(value["rows"].as_array().unwrap().len(), 3);
        assert_eq!(value["categories"][0]["category"], "Bills");
        assert_eq!(value["categories"][1]["count"], 2);
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample();

        let path = write_report(&dir.path().join("reports"), &report, ReportFormat::Csv).unwrap();
        assert_eq!(path.file_name().unwrap(), "expense_report_2024_01.csv");
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Electricity"));
    }

    #[test]
    fn test_write_pdf_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), &sample(), ReportFormat::Pdf).unwrap();

        assert_eq!(path.file_name().unwrap(), "expense_report_2024_01.pdf");
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
