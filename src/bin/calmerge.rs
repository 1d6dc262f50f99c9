use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use calmerge::config::Settings;
use calmerge::fetcher::HttpFeedSource;
use calmerge::groups::load_groups;
use calmerge::publisher::R2Bucket;
use calmerge::Aggregator;

/// Merge iCal feeds per calendar and upload the results
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// The list of calendars to build
    #[arg(long, default_value = "icals.json")]
    config: PathBuf,

    /// Where the generated .ics files are written
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Maximum number of feeds fetched at the same time (defaults to MAX_CONCURRENT_FETCHES, or 8)
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Keep processing the next calendars when one cannot be published
    #[arg(long)]
    keep_going: bool,
}

#[tokio::main]
async fn main() {
    // RUST_LOG may come from the .env file
    let dotenv = calmerge::config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match dotenv {
        Ok(Some(path)) => log::debug!("Loaded environment from {}", path.display()),
        Ok(None) => log::debug!("No .env file, using the process environment only"),
        Err(err) => log::warn!("Unable to load .env file: {}", err),
    }

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    let groups = load_groups(&cli.config)?;
    log::info!("Loaded {} calendar(s) from {}", groups.len(), cli.config.display());

    let source = Arc::new(HttpFeedSource::new(&settings.feed_url_template));
    let store = Arc::new(R2Bucket::new(&settings.storage)?);
    let max_concurrent = cli.max_concurrent.unwrap_or(settings.max_concurrent_fetches);

    let aggregator = Aggregator::new(source, store, &cli.output, max_concurrent)
        .keep_going(cli.keep_going);
    aggregator.run(&groups).await
}
