//! Filter command implementations

use anyhow::{Context, Result};
use tally_core::report::format_currency;
use tally_core::{ExpenseFilter, FilterKind};

use super::core::View;
use super::expenses::print_expense_rows;

fn print_filtered(view: &View) {
    let snapshot = view.snapshot();

    println!();
    println!("🔎 Expenses ({})", snapshot.filter);
    println!("   ─────────────────────────────────────────────────────────────");
    if snapshot.filtered_expenses.is_empty() {
        println!("   No matching expenses.");
        return;
    }
    print_expense_rows(&snapshot.filtered_expenses);

    let total: f64 = snapshot.filtered_expenses.iter().map(|e| e.amount).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {} expenses, total {}",
        snapshot.filtered_expenses.len(),
        format_currency(total)
    );
}

/// Apply a filter, print the matches and remember it for `filter last`
pub async fn cmd_filter(view: &View, filter: ExpenseFilter) -> Result<()> {
    view.apply_filter(filter.clone())
        .await
        .context("Failed to filter expenses")?;

    if filter.kind() != FilterKind::All {
        view.repository()
            .database()
            .save_last_filter(&filter)
            .context("Failed to remember filter")?;
    }

    print_filtered(view);
    Ok(())
}

pub async fn cmd_filter_last(view: &View, kind: FilterKind) -> Result<()> {
    let restored = view
        .restore_filter(kind)
        .await
        .context("Failed to filter expenses")?;

    if restored.is_none() {
        println!("No {} filter has been applied yet.", kind);
        return Ok(());
    }

    print_filtered(view);
    Ok(())
}
