//! Catalog search CLI.
//!
//! Every command loads the catalog file into memory, then answers one request.
//!
//! ```bash
//! catalog index
//! catalog search "pizza franchise" --location pune --max-investment 30
//! catalog suggest piz -n 5
//! catalog recommend pizza-hut --same-sector
//! catalog --catalog data/listings.json --json facets
//! ```

mod output;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use catalog_core::config::{expand_path, Config};
use catalog_hybrid::SearchFilters;
use catalog_service::{CatalogService, SearchRequest};

#[derive(Parser)]
#[command(name = "catalog", version, about = "Hybrid keyword and semantic catalog search")]
struct Cli {
    /// Catalog JSON file (default: data.catalog_path from config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Config file used instead of config.toml / config.<RUST_ENV>.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load and embed the catalog, then report engine stats
    Index,
    /// Hybrid search with optional filters
    Search(SearchArgs),
    /// Autocomplete a prefix
    Suggest {
        prefix: String,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Items similar to the one with this id or slug
    Recommend {
        id: String,
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
        /// Only recommend items from the same sector
        #[arg(long)]
        same_sector: bool,
    },
    /// Distinct sectors, locations and investment ranges
    Facets,
    /// Health report with popular autocomplete terms
    Stats,
}

#[derive(Args)]
struct SearchArgs {
    query: String,
    #[arg(short = 'n', long, default_value = "10")]
    limit: usize,
    #[arg(long, default_value = "0")]
    offset: usize,
    #[arg(long)]
    post_type: Option<String>,
    #[arg(long)]
    sector: Option<String>,
    #[arg(long)]
    location: Option<String>,
    /// Lower investment bound in lakhs
    #[arg(long)]
    min_investment: Option<u64>,
    /// Upper investment bound in lakhs
    #[arg(long)]
    max_investment: Option<u64>,
}

impl SearchArgs {
    fn request(&self) -> SearchRequest {
        SearchRequest::new(&self.query).page(self.offset, self.limit).filters(SearchFilters {
            post_type: self.post_type.clone(),
            sector: self.sector.clone(),
            location: self.location.clone(),
            min_investment: self.min_investment,
            max_investment: self.max_investment,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };
    config.context("loading configuration")
}

fn load_service(cli: &Cli) -> Result<CatalogService> {
    let settings = load_config(cli.config.as_deref())?.settings()?;
    let catalog = cli
        .catalog
        .clone()
        .unwrap_or_else(|| expand_path(&settings.data.catalog_path));
    let service = CatalogService::from_settings(settings).context("building search engine")?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("indexing {}", catalog.display()));
    let indexed = service.retrain_from(&catalog);
    spinner.finish_and_clear();

    let count = indexed.with_context(|| format!("indexing {}", catalog.display()))?;
    tracing::info!(items = count, catalog = %catalog.display(), "catalog loaded");
    Ok(service)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let service = load_service(&cli)?;

    match &cli.command {
        Command::Index => {
            let stats = service.engine().stats();
            output::print(cli.json, &stats, output::stats)?;
        }
        Command::Search(args) => {
            let page = service.search(&args.request())?;
            output::print(cli.json, &page, output::page)?;
        }
        Command::Suggest { prefix, limit } => {
            let suggestions = service.autocomplete(prefix, *limit)?;
            output::print(cli.json, suggestions.as_slice(), output::lines)?;
        }
        Command::Recommend { id, limit, same_sector } => {
            let recs = service.engine().recommend(id, *limit, *same_sector)?;
            output::print(cli.json, &recs, output::recommendations)?;
        }
        Command::Facets => {
            let facets = service.engine().facets();
            output::print(cli.json, &facets, output::facets)?;
        }
        Command::Stats => {
            let health = service.health();
            output::print(cli.json, &health, output::health)?;
        }
    }
    Ok(())
}
