//! Reddit-Sieve main entry point
//!
//! This is the command-line interface for discovering users, fetching their
//! posts, and running fetches in batch.

use anyhow::Context;
use clap::{Parser, Subcommand};
use reddit_sieve::config::load_config_or_default;
use reddit_sieve::filter::Thresholds;
use reddit_sieve::jobs::{
    prepare_batch, run_batch, run_discovery, run_fetch, BatchOptions, CommandFetcher,
    DiscoveryRequest, FetchRequest, InProcessFetcher, UserFetcher, DEFAULT_POST_COUNT,
};
use reddit_sieve::{CancelFlag, Session, SystemClock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Reddit-Sieve: find established users of a subreddit and collect their text posts
///
/// All requests go to the public JSON endpoints, one at a time, with fixed
/// pauses between them and a cooldown whenever the server answers HTTP 429.
#[derive(Parser, Debug)]
#[command(name = "reddit-sieve")]
#[command(version)]
#[command(about = "A paced scraper for public subreddit and user listings", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Directory for generated files (overrides output.directory)
    #[arg(short, long, value_name = "DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find users in a subreddit who meet the karma and account age thresholds
    Discover {
        /// Subreddit to scan, without the r/ prefix
        #[arg(long)]
        subreddit: String,

        /// Number of qualified users to collect
        #[arg(long)]
        users_count: usize,

        /// Minimum total karma (overrides discovery.min-karma)
        #[arg(long)]
        min_karma: Option<i64>,

        /// Minimum account age in days (overrides discovery.min-age-days)
        #[arg(long)]
        min_age_days: Option<f64>,
    },

    /// Fetch the text posts of one user
    Fetch {
        /// Username, without the u/ prefix
        #[arg(long)]
        username: String,

        /// Maximum number of posts to collect
        #[arg(long, default_value_t = DEFAULT_POST_COUNT)]
        post_count: usize,

        /// Only keep posts from this subreddit
        #[arg(long)]
        subreddit: Option<String>,
    },

    /// Fetch posts for every user listed in a discovery table
    Batch {
        /// CSV file with a username column (e.g. users_StockMarket_noapi.csv)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Posts to fetch per user
        #[arg(long, default_value_t = DEFAULT_POST_COUNT)]
        post_count: usize,

        /// Subreddit filter; parsed from the input filename when omitted
        #[arg(long)]
        subreddit: Option<String>,

        /// Run each fetch as `<PATH> fetch ...` in a child process
        #[arg(long, value_name = "PATH")]
        fetch_command: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_config_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Default configuration is invalid".to_string(),
    })?;

    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));

    let cancel = CancelFlag::new();
    spawn_interrupt_listener(cancel.clone());

    let session = Session::with_clock(config.clone(), Arc::new(SystemClock), cancel)
        .context("Failed to initialize HTTP session")?;

    match cli.command {
        Command::Discover {
            subreddit,
            users_count,
            min_karma,
            min_age_days,
        } => {
            let thresholds = Thresholds {
                min_karma: min_karma.unwrap_or(config.discovery.min_karma),
                min_age_days: min_age_days.unwrap_or(config.discovery.min_age_days),
            };
            handle_discover(&session, subreddit, users_count, thresholds, &output_dir).await
        }

        Command::Fetch {
            username,
            post_count,
            subreddit,
        } => {
            let request = FetchRequest {
                username,
                post_count,
                subreddit,
            };
            handle_fetch(&session, &request, &output_dir).await
        }

        Command::Batch {
            input,
            post_count,
            subreddit,
            fetch_command,
        } => {
            let options = BatchOptions {
                input,
                post_count,
                subreddit,
            };
            let fetcher: Arc<dyn UserFetcher> = match fetch_command {
                Some(program) => Arc::new(
                    CommandFetcher::new(program).with_args(child_args(&cli.config, &output_dir)),
                ),
                None => Arc::new(InProcessFetcher::new(session.clone(), output_dir.clone())),
            };
            handle_batch(&session, &options, fetcher).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("reddit_sieve=info,warn"),
            1 => EnvFilter::new("reddit_sieve=debug,info"),
            2 => EnvFilter::new("reddit_sieve=trace,debug"),
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

/// Turns Ctrl-C into a cooperative cancellation request
fn spawn_interrupt_listener(cancel: CancelFlag) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current request...");
            cancel.cancel();
        }
    });
}

/// Global flags forwarded to a child fetch process
fn child_args(config: &Option<PathBuf>, output_dir: &Path) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(path) = config {
        args.push("--config".to_string());
        args.push(path.display().to_string());
    }
    args.push("--output-dir".to_string());
    args.push(output_dir.display().to_string());
    args
}

/// Handles the discover subcommand
async fn handle_discover(
    session: &Session,
    subreddit: String,
    target_count: usize,
    thresholds: Thresholds,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let request = DiscoveryRequest {
        subreddit,
        target_count,
        thresholds,
    };

    let outcome = run_discovery(session, &request, output_dir)
        .await
        .context("Failed to save discovered users")?;

    match &outcome.saved {
        Some(path) => println!(
            "Found {} users ({} authors checked). Saved to {}",
            outcome.users.len(),
            outcome.authors_checked,
            path.display()
        ),
        None => println!("No users found."),
    }

    Ok(())
}

/// Handles the fetch subcommand
async fn handle_fetch(
    session: &Session,
    request: &FetchRequest,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let outcome = run_fetch(session, request, output_dir)
        .await
        .with_context(|| format!("Failed to save posts for u/{}", request.username))?;

    match &outcome.saved {
        Some(saved) => println!(
            "Saved {} posts to {} and {}",
            outcome.posts.len(),
            saved.json.display(),
            saved.csv.display()
        ),
        None => println!("No posts found matching the criteria."),
    }

    Ok(())
}

/// Handles the batch subcommand
async fn handle_batch(
    session: &Session,
    options: &BatchOptions,
    fetcher: Arc<dyn UserFetcher>,
) -> anyhow::Result<()> {
    let plan = prepare_batch(options, fetcher.as_ref()).context("Batch pre-flight failed")?;

    let report = run_batch(session, &plan, fetcher).await;
    println!("\n--- Batch Job Complete: {} ---", report.summary());

    Ok(())
}
