//! Tally CLI - Personal expense tracker
//!
//! Usage:
//!   tally init                                 Initialize database
//!   tally add --amount 250 --category food     Record an expense
//!   tally list --period monthly                List a period with its total
//!   tally filter category food                 Browse by category
//!   tally report --month 2024-01               Export a monthly report

mod cli;
mod commands;


use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tally_core::{Config, ExpenseFilter, SystemClock};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = Config::load().context("Failed to load config")?;
    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path.clone());
    debug!(db = %db_path.display(), "Using database");

    match cli.command {
        Commands::Init => return commands::cmd_init(&db_path, cli.no_encrypt),
        Commands::Categories => return commands::cmd_categories(),
        _ => {}
    }

    let db = commands::open_db(&db_path, cli.no_encrypt)?;
    let view = commands::open_view(db, Arc::new(SystemClock))?;

    match cli.command {
        Commands::Init | Commands::Categories => Ok(()),
        Commands::Add {
            amount,
            category,
            date,
            note,
        } => commands::cmd_add(&view, amount, category, date, note)
            .await
            .map(|_| ()),
        Commands::Edit {
            id,
            amount,
            category,
            date,
            note,
        } => commands::cmd_edit(&view, id, amount, category, date, note).await,
        Commands::Delete { id } => commands::cmd_delete(&view, id).await,
        Commands::Show { id } => commands::cmd_show(&view, id).await,
        Commands::List { period } => {
            commands::cmd_list(&view, period.unwrap_or(config.default_period)).await
        }
        Commands::Period { action } => match action {
            PeriodAction::Custom { start } => commands::cmd_period_custom(&view, start).await,
            PeriodAction::Show => commands::cmd_period_show(&view),
            PeriodAction::Clear => commands::cmd_period_clear(&view),
        },
        Commands::Filter { action } => match action {
            FilterAction::All => commands::cmd_filter(&view, ExpenseFilter::All).await,
            FilterAction::Range { from, to } => {
                let filter = ExpenseFilter::date_range(from, to)?;
                commands::cmd_filter(&view, filter).await
            }
            FilterAction::Category { category } => {
                commands::cmd_filter(&view, ExpenseFilter::category(category)).await
            }
            FilterAction::Last { kind } => commands::cmd_filter_last(&view, kind).await,
        },
        Commands::Report { month, format, out } => {
            let out_dir = out.unwrap_or_else(|| config.report_dir.clone());
            commands::cmd_report(&view, month, format, &out_dir)
                .await
                .map(|_| ())
        }
    }
}
