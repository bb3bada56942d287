//! Article Harvester main entry point
//!
//! This is the command-line interface for the related-article harvester.

use article_harvester::config::{load_database_config, load_settings, HarvestSettings};
use article_harvester::harvester::Harvester;
use article_harvester::storage::SqliteStore;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Article Harvester: collects the related articles of a seed page
///
/// Fetches the seed article, follows every link in its "related articles"
/// block, and stores the title, author and date of each linked article.
#[derive(Parser, Debug)]
#[command(name = "article-harvester")]
#[command(version)]
#[command(about = "Harvest related articles into SQLite", long_about = None)]
struct Cli {
    /// URL of the seed article page
    #[arg(value_name = "SEED_URL")]
    seed_url: Option<String>,

    /// Path to the JSON database credentials file
    #[arg(long, value_name = "PATH", default_value = ".env")]
    env: PathBuf,

    /// Path to an optional TOML settings file
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let seed_url = match cli.seed_url {
        Some(url) if !url.is_empty() => url,
        _ => {
            tracing::error!("Empty argument");
            return Err("Empty argument".into());
        }
    };

    tracing::info!("Starting article harvester");

    // Load database credentials
    let database = match load_database_config(&cli.env) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to load config from {}: {}", cli.env.display(), e);
            return Err(e.into());
        }
    };

    let settings = match load_harvest_settings(cli.settings.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load settings: {}", e);
            return Err(e.into());
        }
    };

    // Open the article store
    let database_path = database.database_path();
    tracing::info!(
        "Opening article store {} at {}",
        database.redacted_connection_string(),
        database_path
    );
    let store = match SqliteStore::open(Path::new(&database_path)) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Open store failed: {}", e);
            return Err(e.into());
        }
    };

    let harvester = match Harvester::from_settings(store, &settings) {
        Ok(harvester) => harvester,
        Err(e) => {
            tracing::error!("Failed to create harvester: {}", e);
            return Err(e.into());
        }
    };

    match harvester.run(&seed_url).await {
        Ok(report) => {
            report.log_summary();
            if report.is_success() {
                tracing::info!("Done");
                Ok(())
            } else {
                Err(format!("{} related articles failed", report.failures.len()).into())
            }
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}

/// Loads settings from `path`, or the defaults when no file was given
fn load_harvest_settings(
    path: Option<&Path>,
) -> Result<HarvestSettings, article_harvester::ConfigError> {
    match path {
        Some(path) => {
            tracing::info!("Loading settings from: {}", path.display());
            load_settings(path)
        }
        None => Ok(HarvestSettings::default()),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("article_harvester=info,warn"),
            1 => EnvFilter::new("article_harvester=debug,info"),
            2 => EnvFilter::new("article_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
