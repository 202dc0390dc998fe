//! Submission predicates and projection used when fetching posts

use crate::model::{PostRecord, Submission};
use chrono::{TimeZone, Utc};
use std::fmt;

/// Body text the platform substitutes for moderator-removed posts
pub const REMOVED_BODY: &str = "[removed]";

/// Body text the platform substitutes for author-deleted posts
pub const DELETED_BODY: &str = "[deleted]";

/// Why a submission was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    WrongSubreddit(String),
    NotSelfPost,
    EmptyBody,
    RemovedBody,
    TooShort { words: usize },
    BadTimestamp,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongSubreddit(name) => write!(f, "posted in r/{}", name),
            Self::NotSelfPost => write!(f, "not a text post"),
            Self::EmptyBody => write!(f, "empty body"),
            Self::RemovedBody => write!(f, "removed or deleted"),
            Self::TooShort { words } => write!(f, "only {} words", words),
            Self::BadTimestamp => write!(f, "invalid creation time"),
        }
    }
}

/// The fetch filter chain
///
/// Checks run in order and stop at the first failure: subreddit, self post,
/// body present, body not removed, word count.
#[derive(Debug, Clone)]
pub struct SubmissionFilter {
    target_subreddit: Option<String>,
    min_word_count: usize,
}

impl SubmissionFilter {
    pub fn new(target_subreddit: Option<&str>, min_word_count: usize) -> Self {
        Self {
            target_subreddit: target_subreddit.map(str::to_string),
            min_word_count,
        }
    }

    /// Applies the chain and projects a surviving submission into a record
    pub fn evaluate(&self, submission: &Submission) -> Result<PostRecord, Rejection> {
        if let Some(target) = &self.target_subreddit {
            if submission.subreddit.to_lowercase() != target.to_lowercase() {
                return Err(Rejection::WrongSubreddit(submission.subreddit.clone()));
            }
        }

        if !submission.is_self {
            return Err(Rejection::NotSelfPost);
        }

        let body = match submission.selftext.as_deref() {
            None | Some("") => return Err(Rejection::EmptyBody),
            Some(REMOVED_BODY) | Some(DELETED_BODY) => return Err(Rejection::RemovedBody),
            Some(body) => body,
        };

        let words = word_count(body);
        if words < self.min_word_count {
            return Err(Rejection::TooShort { words });
        }

        let date = utc_date(submission.created_utc).ok_or(Rejection::BadTimestamp)?;

        Ok(PostRecord {
            id: submission.id.clone(),
            subreddit: submission.subreddit.clone(),
            title: submission.title.clone(),
            body: body.to_string(),
            score: submission.score,
            upvote_ratio: submission.upvote_ratio,
            created_utc: submission.created_utc,
            date,
            url: submission.url.clone(),
            word_count: words,
        })
    }
}

/// Number of whitespace-separated tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Formats a Unix timestamp as a UTC calendar date (`YYYY-MM-DD`)
pub fn utc_date(created_utc: f64) -> Option<String> {
    if !created_utc.is_finite() {
        return None;
    }
    Utc.timestamp_opt(created_utc.floor() as i64, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
}
