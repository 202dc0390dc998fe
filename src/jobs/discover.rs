//! User discovery: scan a subreddit's newest posts for qualified authors

use crate::crawler::{
    fetch_profile, CrawlReport, CrawlSettings, ListingEndpoint, PageVisitor, Paginator, Session,
};
use crate::filter::{qualify, SeenSet, Thresholds};
use crate::model::{CandidateUser, SubredditPost};
use crate::output::save_candidates;
use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parameters of one discovery run
#[derive(Debug, Clone)]
pub struct DiscoveryRequest {
    pub subreddit: String,
    /// Number of qualified users wanted
    pub target_count: usize,
    pub thresholds: Thresholds,
}

/// Result of one discovery run
#[derive(Debug, Clone)]
pub struct DiscoveryOutcome {
    pub users: Vec<CandidateUser>,
    /// Distinct authors whose profile was looked up
    pub authors_checked: usize,
    pub crawl: CrawlReport,
    /// Table written, if any users qualified and the run was persisted
    pub saved: Option<PathBuf>,
}

struct DiscoveryVisitor<'a> {
    session: &'a Session,
    thresholds: Thresholds,
    target: usize,
    profile_delay: Duration,
    cooldown: Duration,
    seen: SeenSet,
    users: Vec<CandidateUser>,
}

#[async_trait]
impl<'a> PageVisitor for DiscoveryVisitor<'a> {
    type Item = SubredditPost;

    fn is_satisfied(&self) -> bool {
        self.users.len() >= self.target
    }

    async fn visit(&mut self, post: SubredditPost) {
        if !self.seen.admit(&post.author) {
            return;
        }

        if !self.session.pause(self.profile_delay).await {
            return;
        }

        let Some(profile) = fetch_profile(self.session, &post.author, self.cooldown).await else {
            return;
        };

        let now = self.session.clock().now();
        if let Some(user) = qualify(&post.author, &profile, self.thresholds, now) {
            tracing::info!(
                "[+] Found: {} (Karma: {}, Age: {}d)",
                user.username,
                user.total_karma,
                user.account_age_days.floor()
            );
            self.users.push(user);
        }
    }
}

/// Scans `r/<subreddit>/new` until enough qualified authors are found
///
/// Each distinct author costs one profile lookup, preceded by the configured
/// profile delay. The listing stops early when the target is reached.
pub async fn discover_users(session: &Session, request: &DiscoveryRequest) -> DiscoveryOutcome {
    let config = &session.config().discovery;

    tracing::info!(
        "--- Scanning r/{} for {} users (karma >= {}, age >= {}d) ---",
        request.subreddit,
        request.target_count,
        request.thresholds.min_karma,
        request.thresholds.min_age_days
    );

    let settings = CrawlSettings {
        page_size: config.page_size,
        page_delay: Duration::ZERO,
        rate_limit_cooldown: config.rate_limit_cooldown(),
        max_rate_limit_retries: session.config().client.max_rate_limit_retries,
    };

    let mut visitor = DiscoveryVisitor {
        session,
        thresholds: request.thresholds,
        target: request.target_count,
        profile_delay: config.profile_delay(),
        cooldown: config.rate_limit_cooldown(),
        seen: SeenSet::new(),
        users: Vec::new(),
    };

    let endpoint = ListingEndpoint::SubredditNew(request.subreddit.clone());
    let crawl = Paginator::new(session, settings)
        .crawl(&endpoint, &mut visitor)
        .await;

    if visitor.seen.is_empty() {
        tracing::warn!("No authors found in r/{}", request.subreddit);
    }

    DiscoveryOutcome {
        authors_checked: visitor.seen.len(),
        users: visitor.users,
        crawl,
        saved: None,
    }
}

/// Discovers users and writes `users_<subreddit>_<mode>.csv` to `output_dir`
pub async fn run_discovery(
    session: &Session,
    request: &DiscoveryRequest,
    output_dir: &Path,
) -> Result<DiscoveryOutcome> {
    let mut outcome = discover_users(session, request).await;

    outcome.saved = save_candidates(
        output_dir,
        &request.subreddit,
        &session.config().discovery.mode_label,
        &outcome.users,
    )?;

    if outcome.saved.is_none() {
        tracing::info!("No users found.");
    }

    Ok(outcome)
}
