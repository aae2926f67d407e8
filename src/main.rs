//! Coursepress main entry point
//!
//! This is the command-line interface for the Coursepress coupon harvester.

use clap::Parser;
use coursepress::classify::{reclassify_all, Classifier};
use coursepress::config::load_config_with_hash;
use coursepress::expiry::run_expiry;
use coursepress::render::HttpRenderer;
use coursepress::scrape::run_scrape_cycle;
use coursepress::storage::SqliteStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Coursepress: a multi-source course-coupon harvester
///
/// Coursepress walks configured coupon listing sites, resolves each course
/// to its outbound platform link, classifies it, and stores it once. A
/// separate expiry sweep retires coupons that have since died.
#[derive(Parser, Debug)]
#[command(name = "coursepress")]
#[command(version = "1.0.0")]
#[command(about = "A multi-source course-coupon harvester", long_about = None)]
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

    /// Validate config and show what would be scraped without scraping
    #[arg(long, conflicts_with_all = ["stats", "expire", "reclassify"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "expire", "reclassify"])]
    stats: bool,

    /// Run an expiry sweep over stored coupons and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "reclassify"])]
    expire: bool,

    /// Re-run classification over every stored course and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "expire"])]
    reclassify: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.expire {
        handle_expire(&config).await?;
    } else if cli.reclassify {
        handle_reclassify(&config).await?;
    } else {
        handle_scrape(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("coursepress=info,warn"),
            1 => EnvFilter::new("coursepress=debug,info"),
            2 => EnvFilter::new("coursepress=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the plan
fn handle_dry_run(config: &coursepress::Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Coursepress Dry Run ===\n");

    println!("Scrape Configuration:");
    println!("  Candidate delay: {}ms", config.scrape.candidate_delay_ms);

    println!("\nRenderer:");
    println!(
        "  Network-settled timeout: {}s",
        config.renderer.network_settled_timeout_secs
    );
    println!(
        "  DOM-ready timeout: {}s",
        config.renderer.dom_ready_timeout_secs
    );
    println!("  Settle delay: {}s", config.renderer.settle_delay_secs);

    println!("\nClassifier:");
    println!("  Remote tier: {}", config.classifier.use_remote);
    if config.classifier.use_remote {
        println!("  Model: {}", config.classifier.model);
    }

    println!("\nExpiry:");
    println!("  Max age: {} days", config.expiry.max_age_days);
    println!("  Batch size: {}", config.expiry.batch_size);
    println!("  Check limit: {}", config.expiry.check_limit);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nSites ({}):", config.sites.len());
    for site in &config.sites {
        let status = if site.enabled { "enabled" } else { "disabled" };
        println!("  - {} ({}, {} pages)", site.source, status, site.pages);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would scrape {} enabled sources",
        config.sites.iter().filter(|s| s.enabled).count()
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &coursepress::Config) -> Result<(), Box<dyn std::error::Error>> {
    use coursepress::stats::{load_statistics, print_statistics};

    println!("Database: {}\n", config.output.database_path);

    let store = SqliteStore::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --expire mode: probes stale coupons and retires dead ones
async fn handle_expire(config: &coursepress::Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = SqliteStore::new(Path::new(&config.output.database_path))?;

    let report = run_expiry(&config.expiry, &mut store).await?;

    println!(
        "Expiry sweep: {} checked, {} expired, {} live, {} errors",
        report.checked, report.expired, report.live, report.errors
    );
    Ok(())
}

/// Handles the --reclassify mode: re-runs classification over the store
async fn handle_reclassify(config: &coursepress::Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = SqliteStore::new(Path::new(&config.output.database_path))?;
    let classifier = Classifier::new(&config.classifier)?;

    let outcome = reclassify_all(&mut store, &classifier).await?;

    println!(
        "Reclassification: {} updated, {} unchanged",
        outcome.updated, outcome.skipped
    );
    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(
    config: &coursepress::Config,
    config_hash: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let enabled = config.sites.iter().filter(|s| s.enabled).count();
    tracing::info!("Starting scrape cycle over {} enabled sources", enabled);

    let mut store = SqliteStore::new(Path::new(&config.output.database_path))?;
    let renderer = HttpRenderer::new(&config.renderer)?;
    let classifier = Classifier::new(&config.classifier)?;

    match run_scrape_cycle(config, config_hash, &mut store, &renderer, &classifier).await {
        Ok(report) => {
            println!(
                "Scrape cycle: {} discovered, {} saved, {} skipped",
                report.total_discovered(),
                report.total_saved(),
                report.total_skipped()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape cycle failed: {}", e);
            Err(e.into())
        }
    }
}
