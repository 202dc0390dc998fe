//! Batch driver: fetch posts for every user of a discovery table
//!
//! Users are processed one at a time in file order. A failing user is logged
//! and skipped; it never stops the batch. Pre-flight checks run before any
//! request is made.

use crate::crawler::Session;
use crate::jobs::fetch::{run_fetch, FetchRequest};
use crate::output::{read_usernames, subreddit_from_filename};
use crate::{BatchError, Result, SieveError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One per-user fetch, as invoked by the batch driver
#[async_trait]
pub trait UserFetcher: Send + Sync {
    /// Fetches and saves posts for one user
    async fn fetch(&self, request: FetchRequest) -> Result<()>;

    /// Executable the fetch depends on, checked during pre-flight
    fn artifact(&self) -> Option<&Path> {
        None
    }
}

/// Runs the fetch in this process
pub struct InProcessFetcher {
    session: Session,
    output_dir: PathBuf,
}

impl InProcessFetcher {
    pub fn new(session: Session, output_dir: PathBuf) -> Self {
        Self {
            session,
            output_dir,
        }
    }
}

#[async_trait]
impl UserFetcher for InProcessFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<()> {
        run_fetch(&self.session, &request, &self.output_dir).await?;
        Ok(())
    }
}

/// Runs the fetch as a child process:
/// `<program> [args...] fetch --username U --post-count N --subreddit S`
pub struct CommandFetcher {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandFetcher {
    /// Creates a fetcher for `program`
    ///
    /// A relative path is resolved against the current directory; `PATH` is
    /// never searched.
    pub fn new(program: PathBuf) -> Self {
        let program = if program.is_relative() {
            std::env::current_dir()
                .map(|dir| dir.join(&program))
                .unwrap_or(program)
        } else {
            program
        };

        Self {
            program,
            args: Vec::new(),
        }
    }

    /// Arguments placed before the `fetch` subcommand (e.g. `--config`)
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

#[async_trait]
impl UserFetcher for CommandFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<()> {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .arg("fetch")
            .arg("--username")
            .arg(&request.username)
            .arg("--post-count")
            .arg(request.post_count.to_string());
        if let Some(subreddit) = &request.subreddit {
            command.arg("--subreddit").arg(subreddit);
        }

        let status = command.status().await?;
        if status.success() {
            Ok(())
        } else {
            Err(SieveError::Fetch {
                username: request.username,
                message: format!("fetch command exited with {}", status),
            })
        }
    }

    fn artifact(&self) -> Option<&Path> {
        Some(&self.program)
    }
}

/// Arguments of a batch run, before validation
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input: PathBuf,
    pub post_count: usize,
    /// Overrides the subreddit parsed from the input filename
    pub subreddit: Option<String>,
}

/// A validated batch, ready to run
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub input: PathBuf,
    pub subreddit: String,
    pub usernames: Vec<String>,
    pub post_count: usize,
}

/// Counters of a finished (or interrupted) batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Users whose fetch was started
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// True when the batch was interrupted before the last user
    pub cancelled: bool,
}

impl BatchReport {
    /// One-line summary printed at the end of a batch
    pub fn summary(&self) -> String {
        format!(
            "Processed: {} users ({} succeeded, {} failed){}",
            self.attempted,
            self.succeeded,
            self.failed,
            if self.cancelled { ", interrupted" } else { "" }
        )
    }
}

/// Validates a batch before any network activity
///
/// Checks, in order: the input file exists, the fetcher's artifact exists,
/// the subreddit is known, and the table has a `username` column.
pub fn prepare_batch(
    options: &BatchOptions,
    fetcher: &dyn UserFetcher,
) -> std::result::Result<BatchPlan, BatchError> {
    if !options.input.is_file() {
        return Err(BatchError::InputNotFound(options.input.clone()));
    }

    if let Some(artifact) = fetcher.artifact() {
        if !artifact.exists() {
            return Err(BatchError::FetchCommandNotFound(artifact.to_path_buf()));
        }
    }

    let subreddit = match &options.subreddit {
        Some(subreddit) => subreddit.clone(),
        None => subreddit_from_filename(&options.input).ok_or_else(|| {
            BatchError::SubredditUndetectable(options.input.display().to_string())
        })?,
    };

    let usernames = read_usernames(&options.input)?;

    Ok(BatchPlan {
        input: options.input.clone(),
        subreddit,
        usernames,
        post_count: options.post_count,
    })
}

/// Fetches every user of `plan` in order
///
/// Each fetch runs on its own task so that an error or a panic stays
/// contained. The configured user delay follows every user, whatever the
/// outcome. Cancellation is honored between users and during the delay.
pub async fn run_batch(
    session: &Session,
    plan: &BatchPlan,
    fetcher: Arc<dyn UserFetcher>,
) -> BatchReport {
    let total = plan.usernames.len();
    let user_delay = session.config().batch.user_delay();
    let mut report = BatchReport::default();

    tracing::info!("--- Batch Processing Started ---");
    tracing::info!("Target Subreddit: r/{}", plan.subreddit);
    tracing::info!("Input File: {}", plan.input.display());
    tracing::info!("Found {} users to process.", total);

    for (index, username) in plan.usernames.iter().enumerate() {
        if session.is_cancelled() {
            report.cancelled = true;
            break;
        }

        report.attempted += 1;
        tracing::info!(
            "[{}/{}] Launching fetch for user: u/{}",
            index + 1,
            total,
            username
        );

        let request = FetchRequest {
            username: username.clone(),
            post_count: plan.post_count,
            subreddit: Some(plan.subreddit.clone()),
        };

        let task_fetcher = Arc::clone(&fetcher);
        let handle = tokio::spawn(async move { task_fetcher.fetch(request).await });

        match handle.await {
            Ok(Ok(())) => report.succeeded += 1,
            Ok(Err(e)) => {
                report.failed += 1;
                tracing::error!("(!) Error fetching u/{}: {}. Moving to next user...", username, e);
            }
            Err(e) => {
                report.failed += 1;
                tracing::error!("(!) Fetch for u/{} crashed: {}. Moving to next user...", username, e);
            }
        }

        if !session.pause(user_delay).await {
            report.cancelled = true;
            break;
        }
    }

    if report.cancelled {
        tracing::warn!("Stopping batch process...");
    }
    tracing::info!("--- Batch Job Complete: {} ---", report.summary());

    report
}
