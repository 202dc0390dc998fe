//! Endpoint templates for the public JSON API

use url::Url;

/// A cursor-paginated listing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEndpoint {
    /// Newest posts of a subreddit (`/r/{name}/new.json`)
    SubredditNew(String),

    /// Submissions of a user (`/user/{name}/submitted.json`)
    UserSubmitted(String),
}

impl ListingEndpoint {
    /// Builds the URL of one page
    ///
    /// # Arguments
    ///
    /// * `base` - Scheme and host, e.g. `https://www.reddit.com`
    /// * `limit` - Page size
    /// * `after` - Cursor returned by the previous page, if any
    pub fn page_url(&self, base: &Url, limit: u32, after: Option<&str>) -> Result<Url, url::ParseError> {
        let (prefix, name, leaf) = match self {
            Self::SubredditNew(name) => ("r", name, "new.json"),
            Self::UserSubmitted(name) => ("user", name, "submitted.json"),
        };

        let mut url = with_segments(base, &[prefix, name, leaf])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &limit.to_string());
            if let Some(after) = after {
                query.append_pair("after", after);
            }
        }
        Ok(url)
    }

    /// Human-readable label for log lines
    pub fn describe(&self) -> String {
        match self {
            Self::SubredditNew(name) => format!("r/{}/new", name),
            Self::UserSubmitted(name) => format!("u/{}/submitted", name),
        }
    }
}

/// URL of a user's profile (`/user/{name}/about.json`)
pub fn user_about_url(base: &Url, username: &str) -> Result<Url, url::ParseError> {
    with_segments(base, &["user", username, "about.json"])
}

/// Appends path segments to `base`, percent-encoding each one
fn with_segments(base: &Url, segments: &[&str]) -> Result<Url, url::ParseError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
