//! Output module for persisting scrape results
//!
//! This module handles:
//! - Naming output files and parsing discovery filenames
//! - Writing candidate users as CSV
//! - Writing post records as JSON and CSV together
//! - Reading usernames back for batch runs
//!
//! Nothing is written for an empty result set.

mod naming;
mod tables;

pub use naming::{discovery_filename, posts_stem, subreddit_from_filename, ALL_LABEL};
pub use tables::{read_usernames, write_csv, write_json, USERNAME_COLUMN};

use crate::model::{CandidateUser, PostRecord};
use crate::Result;
use std::path::{Path, PathBuf};

/// Paths written for one user's posts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPosts {
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Writes the discovery table for `subreddit`
///
/// # Returns
///
/// * `Ok(Some(path))` - The table that was written
/// * `Ok(None)` - No users, nothing written
pub fn save_candidates(
    dir: &Path,
    subreddit: &str,
    mode: &str,
    users: &[CandidateUser],
) -> Result<Option<PathBuf>> {
    if users.is_empty() {
        return Ok(None);
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(discovery_filename(subreddit, mode));
    write_csv(&path, users)?;

    tracing::info!("Saved {} users to {}", users.len(), path.display());
    Ok(Some(path))
}

/// Writes the JSON and CSV post files for `username`
///
/// # Returns
///
/// * `Ok(Some(SavedPosts))` - Both files were written
/// * `Ok(None)` - No posts, nothing written
pub fn save_posts(
    dir: &Path,
    username: &str,
    subreddit: Option<&str>,
    posts: &[PostRecord],
) -> Result<Option<SavedPosts>> {
    if posts.is_empty() {
        return Ok(None);
    }

    std::fs::create_dir_all(dir)?;
    let stem = posts_stem(username, subreddit);
    let saved = SavedPosts {
        json: dir.join(format!("{}.json", stem)),
        csv: dir.join(format!("{}.csv", stem)),
    };

    write_json(&saved.json, posts)?;
    tracing::info!("[JSON] Saved {} posts to {}", posts.len(), saved.json.display());

    write_csv(&saved.csv, posts)?;
    tracing::info!("[CSV]  Saved {} posts to {}", posts.len(), saved.csv.display());

    Ok(Some(saved))
}
