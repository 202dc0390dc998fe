//! Post fetching: collect a user's qualifying text posts

use crate::crawler::{CrawlReport, CrawlSettings, ListingEndpoint, PageVisitor, Paginator, Session};
use crate::filter::SubmissionFilter;
use crate::model::{PostRecord, Submission};
use crate::output::{save_posts, SavedPosts};
use crate::Result;
use async_trait::async_trait;
use std::path::Path;

/// Default number of posts collected per user
pub const DEFAULT_POST_COUNT: usize = 20;

/// Parameters of one fetch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub username: String,
    /// Maximum number of posts to keep
    pub post_count: usize,
    /// Only keep posts from this subreddit (case-insensitive)
    pub subreddit: Option<String>,
}

/// Result of one fetch run
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub posts: Vec<PostRecord>,
    pub crawl: CrawlReport,
    pub saved: Option<SavedPosts>,
}

struct PostVisitor {
    filter: SubmissionFilter,
    target: usize,
    posts: Vec<PostRecord>,
}

#[async_trait]
impl PageVisitor for PostVisitor {
    type Item = Submission;

    fn is_satisfied(&self) -> bool {
        self.posts.len() >= self.target
    }

    async fn visit(&mut self, submission: Submission) {
        match self.filter.evaluate(&submission) {
            Ok(record) => self.posts.push(record),
            Err(rejection) => {
                tracing::debug!("Skipping post {}: {}", submission.id, rejection);
            }
        }
    }
}

/// Walks `u/<username>/submitted` until enough posts pass the filters
pub async fn fetch_posts(session: &Session, request: &FetchRequest) -> FetchOutcome {
    let config = &session.config().fetch;

    tracing::info!("--- Fetching posts for user: u/{} ---", request.username);
    match &request.subreddit {
        Some(subreddit) => tracing::info!("Filter: Only posts in r/{}", subreddit),
        None => tracing::info!("Filter: All subreddits"),
    }

    let settings = CrawlSettings {
        page_size: config.page_size,
        page_delay: config.page_delay(),
        rate_limit_cooldown: config.rate_limit_cooldown(),
        max_rate_limit_retries: session.config().client.max_rate_limit_retries,
    };

    let mut visitor = PostVisitor {
        filter: SubmissionFilter::new(request.subreddit.as_deref(), config.min_word_count),
        target: request.post_count,
        posts: Vec::new(),
    };

    let endpoint = ListingEndpoint::UserSubmitted(request.username.clone());
    let crawl = Paginator::new(session, settings)
        .crawl(&endpoint, &mut visitor)
        .await;

    FetchOutcome {
        posts: visitor.posts,
        crawl,
        saved: None,
    }
}

/// Fetches posts and writes `posts_<username>_<label>.{json,csv}` to `output_dir`
///
/// A crawl that ends early still counts as success; whatever was collected
/// is saved. Only a failed write is an error.
pub async fn run_fetch(
    session: &Session,
    request: &FetchRequest,
    output_dir: &Path,
) -> Result<FetchOutcome> {
    let mut outcome = fetch_posts(session, request).await;

    outcome.saved = save_posts(
        output_dir,
        &request.username,
        request.subreddit.as_deref(),
        &outcome.posts,
    )?;

    if outcome.saved.is_none() {
        tracing::info!("No posts found matching the criteria.");
    }

    Ok(outcome)
}
