//! Expense command implementations (add, edit, delete, show, list)

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::report::format_currency;
use tally_core::{Category, Expense, NewExpense, TimePeriod};

use super::core::{persist_custom_window, View};
use super::truncate;

pub(crate) fn print_expense_rows(expenses: &[Expense]) {
    for expense in expenses {
        println!(
            "   [{}] {} │ {:>14} │ {:<14} │ {}",
            expense.id,
            expense.date,
            format_currency(expense.amount),
            expense.category,
            truncate(&expense.note, 30)
        );
    }
}

pub async fn cmd_add(
    view: &View,
    amount: f64,
    category: Category,
    date: Option<NaiveDate>,
    note: Option<String>,
) -> Result<i64> {
    let date = date.unwrap_or_else(|| view.today());
    let expense = NewExpense::new(amount, category, date).with_note(note.unwrap_or_default());

    let id = view
        .add_expense(expense)
        .await
        .context("Failed to add expense")?;

    println!(
        "✅ Added expense {}: {} on {} ({})",
        id,
        format_currency(amount),
        date,
        category
    );
    Ok(id)
}

pub async fn cmd_edit(
    view: &View,
    id: i64,
    amount: Option<f64>,
    category: Option<Category>,
    date: Option<NaiveDate>,
    note: Option<String>,
) -> Result<()> {
    let mut expense = view
        .load_expense(id)
        .await
        .context("Failed to load expense")?
        .ok_or_else(|| anyhow::anyhow!("Expense {} not found", id))?;

    if amount.is_none() && category.is_none() && date.is_none() && note.is_none() {
        println!("Nothing to change for expense {}.", id);
        return Ok(());
    }

    if let Some(amount) = amount {
        expense.amount = amount;
    }
    if let Some(category) = category {
        expense.category = category;
    }
    if let Some(date) = date {
        expense.date = date;
    }
    if let Some(note) = note {
        expense.note = note;
    }

    view.update_expense(expense.clone())
        .await
        .context("Failed to update expense")?;

    println!("✅ Updated expense {}:", id);
    print_expense_rows(&[expense]);
    Ok(())
}

pub async fn cmd_delete(view: &View, id: i64) -> Result<()> {
    view.delete_expense(id)
        .await
        .with_context(|| format!("Failed to delete expense {}", id))?;
    println!("🗑️  Deleted expense {}", id);
    Ok(())
}

pub async fn cmd_show(view: &View, id: i64) -> Result<()> {
    let expense = view
        .load_expense(id)
        .await
        .context("Failed to load expense")?
        .ok_or_else(|| anyhow::anyhow!("Expense {} not found", id))?;

    println!();
    println!("🧾 Expense {}", expense.id);
    println!("   ─────────────────────────────");
    println!("   Date:     {}", expense.date);
    println!("   Amount:   {}", format_currency(expense.amount));
    println!("   Category: {}", expense.category);
    if !expense.note.is_empty() {
        println!("   Note:     {}", expense.note);
    }
    println!("   Recorded: {}", expense.created_at.format("%Y-%m-%d %H:%M"));
    Ok(())
}

pub async fn cmd_list(view: &View, period: TimePeriod) -> Result<()> {
    view.set_time_period(period)
        .await
        .context("Failed to load expenses")?;
    persist_custom_window(view)?;

    let snapshot = view.snapshot();
    let window = snapshot
        .window
        .map(|w| w.to_string())
        .unwrap_or_default();

    println!();
    println!("📝 Expenses ({}: {})", period, window);
    println!("   ─────────────────────────────────────────────────────────────");

    if snapshot.expenses.is_empty() {
        println!("   No expenses in this period.");
    } else {
        print_expense_rows(&snapshot.expenses);
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total: {}", format_currency(snapshot.total));
    Ok(())
}
