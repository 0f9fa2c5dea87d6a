//! Dashboard Snapshot Builder
//!
//! Loads the configured dataset once and writes every dashboard page, computed
//! with the configured default filters, into a single JSON document.
//!
//! Usage:
//!   cargo run --bin build-dashboard                  # writes dashboard-snapshot.json
//!   cargo run --bin build-dashboard -- out.json      # custom output path

use anyhow::Context;
use fome_zero::config::Config;
use fome_zero::{logging, report, Dataset};
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let output_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dashboard-snapshot.json"));

    let config = Config::load()?;
    let dataset = Dataset::load(&config.dataset.path, config.delimiter()?)
        .with_context(|| format!("Failed to load dataset {}", config.dataset.path.display()))?;

    let mut snapshot = report::snapshot(&dataset, &config.default_filters());
    // The overview page has its own country preselection
    snapshot.overview = report::overview(&dataset, &config.overview_filters());

    let json_string = serde_json::to_string_pretty(&serde_json::json!({
        "dataset": dataset.info(),
        "pages": snapshot,
    }))
    .context("Failed to serialize dashboard snapshot")?;

    fs::write(&output_path, &json_string)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    eprintln!("✅ Dashboard snapshot generated successfully!");
    eprintln!("📄 Saved to: {}", output_path.display());
    eprintln!("📊 {} canonical records, checksum {}", dataset.len(), dataset.info().checksum);
    Ok(())
}
