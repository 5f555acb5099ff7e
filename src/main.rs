//! MediaMason main entry point
//!
//! Command-line interface for the image-board media aggregator.

use clap::Parser;
use mediamason::config::load_config;
use mediamason::crawler::{build_http_client, crawl};
use mediamason::render::GalleryDirSink;
use mediamason::site::adapter_for;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// MediaMason: an image-board media aggregator
///
/// MediaMason crawls a board's paginated listing, follows each qualifying
/// article to its detail page, extracts image and video references, and
/// downloads the assets into a browsable gallery directory.
#[derive(Parser, Debug)]
#[command(name = "mediamason")]
#[command(version)]
#[command(about = "An image-board media aggregator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mediamason=info,warn"),
            1 => EnvFilter::new("mediamason=debug,info"),
            2 => EnvFilter::new("mediamason=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &mediamason::Config) -> anyhow::Result<()> {
    let adapter = adapter_for(config.request.site)?;

    println!("=== MediaMason Dry Run ===\n");

    println!("Request:");
    println!("  Site: {}", config.request.site);
    println!("  Board: {}", config.request.board);
    println!("  Article count: {}", config.request.article_count);
    println!("  Start page: {}", config.request.start_page);
    match config.request.category_filter() {
        Some(category) => println!("  Category filter: {}", category),
        None => println!("  Category filter: (none)"),
    }
    println!("  Best only: {}", config.request.best_only);

    println!("\nCrawler:");
    println!("  Concurrent requests: {}", config.crawler.concurrent_requests);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  User agent: {}", config.crawler.user_agent);
    if let Some(proxy) = &config.crawler.proxy_url {
        println!("  Proxy: {}", proxy);
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Index: {}", config.output.index_filename);

    println!(
        "\nFirst listing URL:\n  {}",
        adapter.build_list_url(&config.request, config.request.start_page)
    );

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &mediamason::Config) -> anyhow::Result<()> {
    let adapter = adapter_for(config.request.site)?;
    let client = build_http_client(&config.crawler)?;
    let sink = GalleryDirSink::new(&config.output.directory, config.output.index_filename.clone())?;

    tracing::info!(
        "Crawling {} board '{}' for {} articles",
        config.request.site,
        config.request.board,
        config.request.article_count
    );

    match crawl(&client, adapter.as_ref(), &config.request, &config.crawler, &sink).await {
        Ok(result) if result.is_empty() => {
            println!("No qualifying articles found on the start page.");
            Ok(())
        }
        Ok(result) => {
            println!(
                "Collected {} articles with {} media items into {}",
                result.articles.len(),
                result.total_media(),
                config.output.directory
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
