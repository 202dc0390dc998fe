//! Author predicates used during discovery

use crate::model::{CandidateUser, UserProfile};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Author name the platform shows for removed accounts
pub const DELETED_AUTHOR: &str = "[deleted]";

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Discovery thresholds; an author must meet both
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub min_karma: i64,
    pub min_age_days: f64,
}

/// Usernames already encountered during one discovery run
#[derive(Debug, Default)]
pub struct SeenSet {
    names: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `author` if it deserves a profile lookup
    ///
    /// Returns false for the deleted-user sentinel and for names already seen.
    /// Only names that return true cost a network request.
    pub fn admit(&mut self, author: &str) -> bool {
        if author == DELETED_AUTHOR {
            return false;
        }
        self.names.insert(author.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Days elapsed between account creation and `now`
pub fn account_age_days(created_utc: f64, now: DateTime<Utc>) -> f64 {
    let now_secs = now.timestamp() as f64 + f64::from(now.timestamp_subsec_millis()) / 1000.0;
    ((now_secs - created_utc) / SECONDS_PER_DAY).max(0.0)
}

/// Builds a candidate if the profile meets both thresholds
///
/// A profile without a creation time is treated as created `now`.
pub fn qualify(
    username: &str,
    profile: &UserProfile,
    thresholds: Thresholds,
    now: DateTime<Utc>,
) -> Option<CandidateUser> {
    let age_days = profile
        .created_utc
        .map(|created| account_age_days(created, now))
        .unwrap_or(0.0);

    if profile.total_karma < thresholds.min_karma || age_days < thresholds.min_age_days {
        tracing::debug!(
            "Rejected u/{} (karma {}, age {:.1}d)",
            username,
            profile.total_karma,
            age_days
        );
        return None;
    }

    Some(CandidateUser {
        username: username.to_string(),
        total_karma: profile.total_karma,
        account_age_days: (age_days * 10.0).round() / 10.0,
        is_mod: profile.is_mod.unwrap_or(false),
        verified: profile.has_verified_email.unwrap_or(false),
    })
}
