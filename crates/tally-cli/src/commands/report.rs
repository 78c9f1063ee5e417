//! Report command implementation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tally_core::report::{format_currency, write_report};
use tally_core::{ExpenseRepository, MonthlyReport, ReportFormat, YearMonth};

use super::core::View;

pub async fn cmd_report(
    view: &View,
    month: Option<YearMonth>,
    format: ReportFormat,
    out_dir: &Path,
) -> Result<PathBuf> {
    let month = month.unwrap_or_else(|| YearMonth::of(view.today()));
    let window = month.window();

    let expenses = view
        .repository()
        .expenses_in_range(window.start, window.end)
        .await
        .context("Failed to load expenses for report")?;

    let categories = view
        .repository()
        .database()
        .category_totals(window)
        .context("Failed to total expenses by category")?;

    let report = MonthlyReport::build(month, &expenses, categories);
    let path = write_report(out_dir, &report, format)
        .with_context(|| format!("Failed to write report to {}", out_dir.display()))?;

    println!("📄 {}", report.title);
    println!(
        "   {} expenses, total {}",
        report.rows.len(),
        format_currency(report.total)
    );
    println!("   Saved to {}", path.display());
    Ok(path)
}
