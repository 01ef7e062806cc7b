//! Ideia-Crawler main entry point
//!
//! This is the command-line interface for the Ideia-Crawler idea listing crawler.

use anyhow::Context;
use clap::Parser;
use ideia_crawler::config::{load_config_with_hash, require_base_url, validate, Config};
use ideia_crawler::crawler::{crawl, Seed};
use ideia_crawler::output::{load_links, print_summary, same_file, FileSink, ResultSink};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ideia-Crawler: a polite crawler for paginated idea listings
///
/// Walks an idea listing page by page (or a saved list of idea links),
/// extracts one record per idea, and saves the result as JSON and CSV.
#[derive(Parser, Debug)]
#[command(name = "ideia-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A polite crawler for paginated idea listings", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL of the listing (overrides `crawler.base-url`)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Maximum number of listing pages to process
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Delay between requests, in seconds
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// Base name of the result files
    #[arg(short, long, value_name = "NAME")]
    output: Option<String>,

    /// Visit the idea links of a saved JSON result instead of paginating
    #[arg(long, value_name = "FILE")]
    links_from: Option<PathBuf>,

    /// Save a snapshot after every page that added ideas
    #[arg(long)]
    checkpoint: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;

    let seed = build_seed(&mut config, &cli)?;

    if cli.dry_run {
        handle_dry_run(&config, &seed);
        return Ok(());
    }

    handle_crawl(config, seed).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ideia_crawler=info,warn"),
            1 => EnvFilter::new("ideia_crawler=debug,info"),
            2 => EnvFilter::new("ideia_crawler=trace,debug"),
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

/// Command-line flags win over the configuration file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(base_url) = &cli.base_url {
        config.crawler.base_url = Some(base_url.clone());
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay = delay;
    }
    if let Some(output) = &cli.output {
        config.output.base_filename = output.clone();
    }
    if cli.checkpoint {
        config.output.checkpoint = true;
    }
}

/// Picks the crawl mode
///
/// In link-list mode the output base name gets a `_detalhes` suffix when the
/// result would otherwise overwrite the input file.
fn build_seed(config: &mut Config, cli: &Cli) -> anyhow::Result<Seed> {
    let Some(links_path) = &cli.links_from else {
        let seed = require_base_url(&config.crawler)
            .context("A seed URL is required (set crawler.base-url or pass --base-url)")?;
        return Ok(Seed::Listing(seed));
    };

    let output_path = FileSink::new().json_path(&config.output.base_filename);
    if same_file(&output_path, links_path) {
        let renamed = format!("{}_detalhes", config.output.base_filename);
        tracing::warn!(
            "{} is the input file; saving details as {} instead",
            output_path.display(),
            renamed
        );
        config.output.base_filename = renamed;
    }

    let links = load_links(links_path);
    if links.is_empty() {
        tracing::warn!("No idea links found in {}", links_path.display());
    }

    Ok(Seed::Links(links))
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, seed: &Seed) {
    println!("=== Ideia-Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    match config.crawler.max_pages {
        Some(max_pages) => println!("  Max pages: {}", max_pages),
        None => println!("  Max pages: unlimited"),
    }
    println!("  Delay: {}s", config.crawler.delay);
    println!("  Timeout: {}s", config.crawler.timeout);

    println!("\nOutput:");
    println!("  JSON: {}", FileSink::new().json_path(&config.output.base_filename).display());
    println!("  CSV: {}", FileSink::new().csv_path(&config.output.base_filename).display());
    println!("  Checkpoint: {}", if config.output.checkpoint { "yes" } else { "no" });

    println!("\nListing Selectors:");
    println!("  Title heading: {}", config.listing.title_heading);
    println!("  Title link: {}", config.listing.title_link);

    println!("\nDetail Selectors:");
    println!("  Highlight: {} > {}", config.detail.highlight, config.detail.title_heading);
    println!("  Details: {} > {}", config.detail.details, config.detail.paragraph);
    for (field, position) in config.detail.positional_fields() {
        println!("    {} = paragraph {}", field, position);
    }
    for (field, selector) in config.detail.region_fields() {
        println!("  {}: {}", field, selector);
    }

    println!("\n✓ Configuration is valid");
    match seed {
        Seed::Listing(url) => println!("✓ Would paginate the listing starting at {}", url),
        Seed::Links(urls) => println!("✓ Would visit {} idea pages", urls.len()),
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, seed: Seed) -> anyhow::Result<()> {
    let base_name = &config.output.base_filename;

    let outcome = crawl(&config, seed)
        .await
        .context("Failed to set up the crawler")?;

    print_summary(&outcome.result, Some(&outcome.stop_reason));

    let saved = FileSink::new()
        .save(&outcome.result, base_name)
        .with_context(|| format!("Failed to save results as {}", base_name))?;

    println!("\n✓ Results saved to: {}", saved.json.display());
    if let Some(csv) = saved.csv {
        println!("✓ Ideas exported to: {}", csv.display());
    }

    Ok(())
}
