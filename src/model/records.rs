//! Output records
//!
//! Field order here is the column order of the generated CSV files.

use serde::{Deserialize, Serialize};

/// A user who passed both discovery thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateUser {
    pub username: String,
    pub total_karma: i64,
    /// Account age in days, rounded to one decimal
    pub account_age_days: f64,
    pub is_mod: bool,
    pub verified: bool,
}

/// A text post that passed every fetch filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub subreddit: String,
    pub title: String,
    pub body: String,
    pub score: i64,
    pub upvote_ratio: f64,
    pub created_utc: f64,
    /// `created_utc` as a UTC calendar date (`YYYY-MM-DD`)
    pub date: String,
    pub url: String,
    pub word_count: usize,
}
