//! Inclusion predicates and record projection
//!
//! Discovery keeps authors that are new to the run and meet both thresholds;
//! fetching keeps long enough text posts, optionally from one subreddit.
//! Cheap local checks always run before anything that needs a request.

mod authors;
mod submissions;

pub use authors::{account_age_days, qualify, SeenSet, Thresholds, DELETED_AUTHOR};
pub use submissions::{
    utc_date, word_count, Rejection, SubmissionFilter, DELETED_BODY, REMOVED_BODY,
};
