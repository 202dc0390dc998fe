//! Wire types for the public JSON endpoints
//!
//! Listings share one envelope: `{"data": {"children": [{"data": ...}], "after": ...}}`.
//! Profiles come back as `{"data": {...}}` from the `about` endpoint.

use serde::Deserialize;

/// One page of a cursor-paginated listing
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    #[serde(default = "ListingData::empty")]
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    #[serde(default = "Vec::new")]
    pub children: Vec<Thing<T>>,

    /// Cursor for the next page; `None` at the end of the listing
    #[serde(default)]
    pub after: Option<String>,
}

impl<T> ListingData<T> {
    fn empty() -> Self {
        Self {
            children: Vec::new(),
            after: None,
        }
    }
}

/// A listing child wrapper (`kind` is ignored)
#[derive(Debug, Clone, Deserialize)]
pub struct Thing<T> {
    pub data: T,
}

impl<T> Listing<T> {
    /// Splits the page into its items and the next cursor
    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        let items = self.data.children.into_iter().map(|c| c.data).collect();
        // An empty string cursor is treated like a missing one
        let after = self.data.after.filter(|a| !a.is_empty());
        (items, after)
    }
}

/// Minimal view of a subreddit post, used only to learn its author
#[derive(Debug, Clone, Deserialize)]
pub struct SubredditPost {
    pub author: String,
}

/// A submission from a user's `submitted` listing
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub id: String,
    pub subreddit: String,
    pub title: String,

    /// Body text of a self post; empty or null for link posts
    #[serde(default)]
    pub selftext: Option<String>,

    #[serde(default)]
    pub is_self: bool,

    #[serde(default)]
    pub score: i64,

    #[serde(default)]
    pub upvote_ratio: f64,

    /// Seconds since the Unix epoch
    pub created_utc: f64,

    #[serde(default)]
    pub url: String,
}

/// Envelope of the `about` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct About {
    pub data: Option<UserProfile>,
}

/// Public profile fields used for qualification
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    /// Sum of link and comment karma
    #[serde(default)]
    pub total_karma: i64,

    /// Account creation time in seconds since the Unix epoch
    #[serde(default)]
    pub created_utc: Option<f64>,

    #[serde(default)]
    pub is_mod: Option<bool>,

    #[serde(default)]
    pub has_verified_email: Option<bool>,
}
