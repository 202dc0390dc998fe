//! Output filename templates
//!
//! Discovery writes `users_<Subreddit>_<mode>.csv`; fetching writes
//! `posts_<username>_<label>.{json,csv}`. The batch driver reads the subreddit
//! back out of a discovery filename.

use std::path::Path;

/// Label used for post files when no subreddit filter is set
pub const ALL_LABEL: &str = "all";

/// Filename of a discovery table
pub fn discovery_filename(subreddit: &str, mode: &str) -> String {
    format!("users_{}_{}.csv", sanitize_component(subreddit), mode)
}

/// Filename stem shared by the JSON and CSV post files
pub fn posts_stem(username: &str, subreddit: Option<&str>) -> String {
    format!(
        "posts_{}_{}",
        sanitize_component(username),
        sanitize_component(subreddit.unwrap_or(ALL_LABEL))
    )
}

/// Extracts the subreddit from a discovery filename
///
/// The subreddit is everything between the first and the last `_` of the
/// file stem, so names containing underscores survive the round trip. A stem
/// with a single `_` yields whatever follows it.
///
/// ```
/// use reddit_sieve::output::subreddit_from_filename;
/// use std::path::Path;
///
/// assert_eq!(
///     subreddit_from_filename(Path::new("data/users_StockMarket_noapi.csv")).as_deref(),
///     Some("StockMarket")
/// );
/// ```
pub fn subreddit_from_filename(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let (_, rest) = stem.split_once('_')?;

    let subreddit = match rest.rsplit_once('_') {
        Some((subreddit, _mode)) => subreddit,
        None => rest,
    };

    if subreddit.is_empty() {
        None
    } else {
        Some(subreddit.to_string())
    }
}

/// Replaces characters that would escape the output directory
fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '-',
            c => c,
        })
        .collect()
}
