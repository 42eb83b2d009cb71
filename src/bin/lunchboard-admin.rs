//! Maintenance commands against the configured lunch table.
//!
//! Usage:
//!   lunchboard-admin publish --meal "Chicken Rice" [--date 2024-01-01] [--key SECRET]
//!   lunchboard-admin show [--date 2024-01-01]
//!   lunchboard-admin history
//!   lunchboard-admin export --out backup.csv
//!   lunchboard-admin import --from backup.csv
//!
//! The store is chosen by the same environment variables as the API
//! (STORE_BACKEND, DATABASE_URL, CSV_PATH, ADMIN_SECRET, ADMIN_SECRET_SHA256).

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use lunchboard_api::{
    config::Config,
    db::{self, RecordStore},
    services::lunch::LunchBoard,
    AppState,
};

#[derive(Parser)]
#[command(name = "lunchboard-admin", about = "Manage the daily lunch menu and ratings")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Publish (or replace) the menu for a day
    Publish {
        #[arg(long)]
        meal: String,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Admin credential; defaults to ADMIN_SECRET
        #[arg(long)]
        key: Option<String>,
    },
    /// Show the meal, average and ratings for a day
    Show {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List days with a published menu, newest first
    History,
    /// Write the whole table to a CSV file
    Export {
        #[arg(long)]
        out: PathBuf,
    },
    /// Replace the whole table with the contents of a CSV file
    Import {
        #[arg(long)]
        from: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let store = db::open_store(&config).await?;

    match args.command {
        Command::Publish { meal, date, key } => {
            let date = date.unwrap_or_else(LunchBoard::today);
            let key = key.unwrap_or_else(|| config.admin_secret.clone());
            let state = AppState::new(config, store)?;
            let entry = state
                .board
                .publish_menu(date, &meal, &key)
                .await
                .with_context(|| format!("Failed to publish menu for {date}"))?;
            println!("Published {} for {}", entry.meal_name.unwrap_or_default(), date);
        }
        Command::Show { date } => {
            let date = date.unwrap_or_else(LunchBoard::today);
            let state = AppState::new(config, store)?;
            let summary = state.board.day_summary(date).await;
            match &summary.meal_name {
                Some(meal) => println!("{date}: {meal}"),
                None => println!("{date}: no menu set"),
            }
            if let Some(avg) = summary.average {
                println!("Average: {:.1} ({} ratings)", avg, summary.rating_count);
            }
            for r in &summary.ratings {
                println!(
                    "  {:<8} {:<16} {:>4} {}",
                    r.timestamp.map(|t| t.to_string()).unwrap_or_default(),
                    r.user_name.as_deref().unwrap_or_default(),
                    r.score.map(|s| s.to_string()).unwrap_or_default(),
                    r.comment.as_deref().unwrap_or_default(),
                );
            }
        }
        Command::History => {
            let state = AppState::new(config, store)?;
            let dates = state.board.history().await;
            if dates.is_empty() {
                println!("No menus published yet");
            }
            for date in dates {
                println!("{date}");
            }
        }
        Command::Export { out } => {
            let count = db::export_to_csv(store.as_ref(), &out)
                .await
                .with_context(|| format!("Failed to export to {:?}", out))?;
            println!("Exported {count} rows to {:?}", out);
        }
        Command::Import { from } => {
            let count = db::import_from_csv(store.as_ref(), &from)
                .await
                .with_context(|| format!("Failed to import {:?}", from))?;
            println!("Imported {count} rows into the {} store", store.backend_name());
        }
    }

    Ok(())
}
