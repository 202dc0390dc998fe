//! Shared fixtures for integration tests
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use reddit_sieve::config::Config;
use reddit_sieve::crawler::{CancelFlag, ManualClock};
use reddit_sieve::Session;
use serde_json::{json, Value};
use std::sync::Arc;

/// Fixed starting point of every manual clock
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Default configuration pointed at a mock server
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.client.base_url = base_url.to_string();
    config.client.user_agent = "TestSieve/1.0".to_string();
    config
}

/// Session on a manual clock; sleeps are recorded and return immediately
pub fn test_session(config: Config) -> (Session, Arc<ManualClock>) {
    test_session_with_cancel(config, CancelFlag::new())
}

pub fn test_session_with_cancel(config: Config, cancel: CancelFlag) -> (Session, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_time()));
    let session =
        Session::with_clock(config, clock.clone(), cancel).expect("Failed to build session");
    (session, clock)
}

/// A listing page wrapping `items`
pub fn listing(items: Vec<Value>, after: Option<&str>) -> Value {
    let children: Vec<Value> = items
        .into_iter()
        .map(|data| json!({ "kind": "t3", "data": data }))
        .collect();

    json!({
        "kind": "Listing",
        "data": { "after": after, "children": children }
    })
}

/// A subreddit post; only the author matters to discovery
pub fn author_post(author: &str) -> Value {
    json!({ "author": author, "title": "anything", "subreddit": "StockMarket" })
}

/// A user profile created `age_days` before the test start time
pub fn profile(karma: i64, age_days: f64) -> Value {
    let created = start_time().timestamp() as f64 - age_days * 86_400.0;
    json!({
        "kind": "t2",
        "data": {
            "total_karma": karma,
            "created_utc": created,
            "is_mod": false,
            "has_verified_email": true
        }
    })
}

/// Body long enough to pass the default word minimum
pub const LONG_BODY: &str = "this post body has comfortably more than fifteen words in it so that the length filter keeps it around";

/// A self post in `subreddit` with the given body
pub fn text_post(id: &str, subreddit: &str, body: Option<&str>) -> Value {
    json!({
        "id": id,
        "subreddit": subreddit,
        "title": format!("Post {}", id),
        "selftext": body,
        "is_self": true,
        "score": 10,
        "upvote_ratio": 0.95,
        "created_utc": 1_700_000_000.0,
        "url": format!("https://www.reddit.com/r/{}/comments/{}/", subreddit, id)
    })
}

/// A link post
pub fn link_post(id: &str, subreddit: &str) -> Value {
    json!({
        "id": id,
        "subreddit": subreddit,
        "title": format!("Link {}", id),
        "selftext": "",
        "is_self": false,
        "score": 1,
        "upvote_ratio": 0.5,
        "created_utc": 1_700_000_000.0,
        "url": "https://example.com/article"
    })
}
