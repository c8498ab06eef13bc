//! sift-recent - Print the recency predicates for the configured window
//!
//! Usage:
//!   sift-recent [--config PATH] [--days N] [--check PREDICATE]

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use sift_core::config::{clamp_recent_days, default_config_path, AnalysisSettings};
use sift_core::filter::{build_absolute_filter, build_relative_filter, FilterPredicate};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sift-recent", about = "Show recently-added filter predicates")]
struct Cli {
    /// Settings file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the recent-days window (1-3650)
    #[arg(long)]
    days: Option<u32>,

    /// Parse a predicate and show how the executor reads it
    #[arg(long)]
    check: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(|| default_config_path("analysis.yaml"));
    let settings = AnalysisSettings::load(&config_path);
    let days = cli
        .days
        .map(clamp_recent_days)
        .unwrap_or(settings.recent_days);

    println!("Reference date: {}", Utc::now().date_naive());
    println!("Window:         {} days", days);
    println!("Absolute:       {}", build_absolute_filter(days, settings.date_format));
    println!("Relative:       {}", build_relative_filter(days));

    if let Some(text) = cli.check {
        let predicate = FilterPredicate::parse(&text, settings.date_format)
            .with_context(|| format!("Cannot read predicate '{}'", text))?;
        println!("Parsed:         {:?}", predicate);
    }

    Ok(())
}
