use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use fome_zero::config::Config;
use fome_zero::report::{self, Page};
use fome_zero::server::{self, AppState, FilterParams};
use fome_zero::{logging, metrics, Dataset};

#[derive(Parser)]
#[command(name = "fome_zero")]
#[command(about = "Fome Zero growth dashboard over the restaurant dataset")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file (defaults to $FOME_ZERO_CONFIG or config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset file, overriding the configured path
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard pages as a read-only JSON API
    Serve {
        /// Port to listen on, overriding the configured one
        #[arg(long)]
        port: Option<u16>,
        /// Do not start the Prometheus exporter
        #[arg(long)]
        no_metrics: bool,
    },
    /// Print one dashboard page as JSON
    Report {
        #[arg(value_enum)]
        page: Page,
        #[command(flatten)]
        filters: FilterArgs,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print a summary of the normalized dataset
    Inspect,
}

#[derive(Args)]
struct FilterArgs {
    /// Countries to include (comma-separated, default all)
    #[arg(long)]
    countries: Option<String>,
    /// Cuisines to include (comma-separated, default all)
    #[arg(long)]
    cuisines: Option<String>,
    /// How many cities the city rankings show (0-100)
    #[arg(long)]
    cities: Option<usize>,
    /// How many restaurants the top restaurants table shows (0-100)
    #[arg(long)]
    restaurants: Option<usize>,
}

impl From<FilterArgs> for FilterParams {
    fn from(args: FilterArgs) -> Self {
        FilterParams {
            countries: args.countries,
            cuisines: args.cuisines,
            cities: args.cities,
            restaurants: args.restaurants,
        }
    }
}

fn load_dataset(config: &Config) -> anyhow::Result<Dataset> {
    let path = &config.dataset.path;
    Dataset::load(path, config.delimiter()?)
        .with_context(|| format!("Failed to load dataset {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dataset) = cli.dataset {
        config.dataset.path = dataset;
    }

    // anyhow prints the error chain when main returns
    run(cli.command, &config).await.map_err(|e| {
        error!("{:#}", e);
        e
    })
}

async fn run(command: Commands, config: &Config) -> anyhow::Result<()> {
    match command {
        Commands::Serve { port, no_metrics } => {
            let dataset = load_dataset(config)?;
            let port = port.unwrap_or(config.server.port);

            if !no_metrics {
                metrics::init_metrics(config.server.metrics_port);
            }

            let state = AppState::new(dataset, config.default_filters())
                .with_overview_defaults(config.overview_filters());
            info!(port, "Starting dashboard server");
            if let Err(e) = server::start_server(state, port).await {
                anyhow::bail!("Server failed: {}", e);
            }
        }
        Commands::Report {
            page,
            filters,
            pretty,
        } => {
            let dataset = load_dataset(config)?;
            let base = match page {
                Page::Overview => config.overview_filters(),
                _ => config.default_filters(),
            };
            let filter = FilterParams::from(filters).into_filter(&base);
            let output = report::page(&dataset, page, &filter);

            let json = if pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{}", json);
        }
        Commands::Inspect => {
            let dataset = load_dataset(config)?;
            let info = dataset.info();
            println!("\n📊 Dataset: {}", config.dataset.path.display());
            println!("   Checksum: {}", info.checksum);
            println!("   Rows read: {}", info.rows_read);
            println!("   Duplicates dropped: {}", info.duplicates_dropped);
            println!("   Canonical records: {}", info.records);

            let counters = fome_zero::analytics::global_counters(
                dataset.records(),
                &config.default_filters(),
            );
            println!("   Countries: {}", counters.countries);
            println!("   Cities: {}", counters.cities);
            println!("   Cuisines: {}", counters.cuisines);
            println!("   Votes: {}", counters.votes);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fome_zero::DashboardError;

    #[test]
    fn test_load_failure_is_returned_with_context() {
        let mut config = Config::default();
        config.dataset.path = PathBuf::from("/no/such/zomato.csv");

        let err = load_dataset(&config).unwrap_err();
        assert!(err.to_string().contains("Failed to load dataset /no/such/zomato.csv"));
        assert!(matches!(
            err.downcast_ref::<DashboardError>(),
            Some(DashboardError::Io(_))
        ));
    }
}
