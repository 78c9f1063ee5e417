//! Custom month window commands

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::report::format_currency;

use super::core::{persist_custom_window, View};

pub async fn cmd_period_custom(view: &View, start: NaiveDate) -> Result<()> {
    view.set_custom_month_start(start)
        .await
        .context("Failed to load expenses for custom window")?;
    persist_custom_window(view)?;

    let snapshot = view.snapshot();
    match snapshot.custom_window {
        Some(window) => {
            println!("✅ Custom window set: {} to {}", window.start(), window.end());
            if window.start() != start {
                println!("   (rolled forward from {} to include today)", start);
            }
        }
        None => println!("✅ Custom window set"),
    }
    println!(
        "   {} expenses, total {}",
        snapshot.expenses.len(),
        format_currency(snapshot.total)
    );
    Ok(())
}

pub fn cmd_period_show(view: &View) -> Result<()> {
    match view.custom_window() {
        Some(window) => {
            persist_custom_window(view)?;
            println!("📅 Custom window: {} to {}", window.start(), window.end());
        }
        None => {
            println!("No custom window set. Set one with:");
            println!("  tally period custom --start 2024-01-15");
        }
    }
    Ok(())
}

pub fn cmd_period_clear(view: &View) -> Result<()> {
    view.clear_custom_window();
    persist_custom_window(view)?;
    println!("✅ Custom window cleared");
    Ok(())
}
