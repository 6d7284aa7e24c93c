//! Tidepool main entry point
//!
//! Command-line interface for the tidepool website mirror.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tidepool::config::{load_config_with_hash, Config};
use tidepool::crawler::mirror;
use tidepool::mapper::local_path_for;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Tidepool: a same-host website mirror
///
/// Tidepool downloads a site into a locally browsable directory tree,
/// following every same-host link, image, script, and stylesheet reference
/// and rewriting them to relative local paths.
#[derive(Parser, Debug)]
#[command(name = "tidepool")]
#[command(version)]
#[command(about = "A same-host website mirror", long_about = None)]
struct Cli {
    /// Seed URL to start mirroring from
    #[arg(value_name = "URL")]
    url: String,

    /// Directory to write the mirror under (defaults to the seed host)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate inputs and show what would be mirrored without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let seed = match parse_seed(&cli.url) {
        Ok(seed) => seed,
        Err(message) => {
            eprintln!("tidepool: {}", message);
            eprintln!("Usage: tidepool [OPTIONS] <URL>");
            std::process::exit(2);
        }
    };

    if let Err(error) = run(cli, seed).await {
        tracing::error!("{:#}", error);
        std::process::exit(1);
    }
}

/// Sets up the tracing subscriber based on verbosity level
///
/// Logs go to stderr so they never mix with anything a caller might pipe
/// from stdout.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tidepool=info,warn"),
            1 => EnvFilter::new("tidepool=debug,info"),
            2 => EnvFilter::new("tidepool=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Parses and validates the seed URL argument
fn parse_seed(raw: &str) -> Result<Url, String> {
    let seed = Url::parse(raw).map_err(|e| format!("invalid URL '{}': {}", raw, e))?;

    if !matches!(seed.scheme(), "http" | "https") {
        return Err(format!(
            "unsupported scheme '{}': only http and https sites can be mirrored",
            seed.scheme()
        ));
    }

    if seed.host_str().is_none() {
        return Err(format!("URL '{}' has no host", raw));
    }

    Ok(seed)
}

/// Chooses the mirror root: CLI flag, then config file, then the seed host
fn output_directory(cli: &Cli, config: &Config, seed: &Url) -> PathBuf {
    if let Some(dir) = &cli.output {
        return dir.clone();
    }
    if let Some(dir) = &config.output.directory {
        return PathBuf::from(dir);
    }
    PathBuf::from(seed.host_str().unwrap_or("mirror"))
}

/// Handles the --dry-run mode: validates inputs and shows the target layout
fn print_dry_run(config: &Config, seed: &Url, base_dir: &Path) {
    println!("=== Tidepool Dry Run ===\n");

    println!("Seed URL: {}", seed);
    println!("Mirror root: {}", base_dir.display());
    println!(
        "Seed page would be written to: {}",
        local_path_for(base_dir, seed).display()
    );

    println!("\nFetch:");
    println!("  User agent: {}", config.fetch.user_agent);
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Connect timeout: {}s", config.fetch.connect_timeout_secs);

    println!("\n✓ Configuration is valid");
}

/// Handles the main mirror operation
async fn run(cli: Cli, seed: Url) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!(
                "Configuration loaded from {} (hash: {})",
                path.display(),
                hash
            );
            config
        }
        None => Config::default(),
    };

    let base_dir = output_directory(&cli, &config, &seed);

    if cli.dry_run {
        print_dry_run(&config, &seed, &base_dir);
        return Ok(());
    }

    tracing::info!("Mirroring {} into {}", seed, base_dir.display());

    let stats = mirror(&seed, base_dir, &config)
        .await
        .with_context(|| format!("failed to mirror seed URL {}", seed))?;

    tracing::info!(
        "Mirror complete: {} pages, {} assets, {} failed references",
        stats.pages,
        stats.assets,
        stats.failures
    );

    Ok(())
}
