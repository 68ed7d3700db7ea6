//! epiotrkow.pl RSS scraper CLI
//!
//! Meant to be run from a scheduler; exits non-zero when a run fails.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use epiotrkow_rss::{
    error::Result,
    models::Config,
    pipeline,
    services::{ArticleParser, DetailEnricher, HttpFetcher},
    storage::{FeedStorage, LocalStorage},
};

/// epiotrkow.pl news → RSS 2.0
#[derive(Parser, Debug)]
#[command(
    name = "epiotrkow-rss",
    version,
    about = "Scrape epiotrkow.pl news listings into an RSS feed"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape listing pages and write the feed
    Run {
        /// Number of listing pages to fetch
        #[arg(long)]
        pages: Option<u32>,

        /// Output file (overrides feed.output_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration and selectors
    Validate,

    /// Show the currently published feed
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run { pages, output } => {
            let mut config = Config::load_or_default(&cli.config);
            if let Some(pages) = pages {
                config.listing.page_count = pages;
            }
            if let Some(output) = output {
                config.feed.output_path = output;
            }
            config.validate()?;

            let fetcher = HttpFetcher::new(&config.crawler)?;
            let storage = LocalStorage::new(&config.feed.output_path);

            let summary = match pipeline::run_scraper(&config, &fetcher, &storage).await {
                Ok(summary) => summary,
                Err(e) => {
                    log::error!("Run failed: {}", e);
                    return Err(e);
                }
            };

            log::info!(
                "Wrote {} items ({} bytes) to {} ({}/{} pages, {} failed) in {}s",
                summary.items_written,
                summary.bytes_written,
                summary.output_path.display(),
                summary.pages_fetched,
                summary.pages_total,
                summary.pages_failed,
                (summary.finished_at - summary.started_at).num_seconds()
            );
        }

        Command::Validate => {
            log::info!("Validating {}...", cli.config.display());

            let config = Config::load(&cli.config)?;
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            let fetcher = HttpFetcher::new(&config.crawler)?;
            ArticleParser::from_config(&config)?;
            DetailEnricher::new(&fetcher, &config.details, std::time::Duration::ZERO)?;
            log::info!("✓ Selectors compile");

            log::info!("All validations passed!");
        }

        Command::Info => {
            let config = Config::load_or_default(&cli.config);
            let storage = LocalStorage::new(&config.feed.output_path);
            log::info!("Feed path: {}", storage.output_path().display());

            match storage.load_feed().await? {
                Some(channel) => {
                    log::info!("Title: {}", channel.title());
                    log::info!(
                        "Last build: {}",
                        channel.last_build_date().unwrap_or("unknown")
                    );
                    log::info!("Items: {}", channel.items().len());
                }
                None => log::info!("No feed published yet."),
            }
        }
    }

    Ok(())
}
