//! Integration tests for the paginated crawl
//!
//! These tests use wiremock to serve listing pages and drive the post fetch
//! through pagination, rate limiting, and failure scenarios.

mod common;

use common::{link_post, listing, test_config, test_session, test_session_with_cancel, text_post, LONG_BODY};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reddit_sieve::crawler::{CancelFlag, Clock};
use reddit_sieve::filter::word_count;
use reddit_sieve::jobs::{fetch_posts, run_fetch, FetchRequest};
use reddit_sieve::{Session, StopReason};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUBMITTED: &str = "/user/alice/submitted.json";

fn request(post_count: usize, subreddit: Option<&str>) -> FetchRequest {
    FetchRequest {
        username: "alice".to_string(),
        post_count,
        subreddit: subreddit.map(str::to_string),
    }
}

#[tokio::test]
async fn test_empty_second_page_stops_crawl() {
    let mock_server = MockServer::start().await;

    // Page two: empty, but still advertises a cursor
    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .and(query_param("after", "t3_p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![], Some("t3_p2"))))
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    // Page one
    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            vec![
                text_post("a1", "rust", Some(LONG_BODY)),
                text_post("a2", "rust", Some(LONG_BODY)),
            ],
            Some("t3_p1"),
        )))
        .mount(&mock_server)
        .await;

    let (session, clock) = test_session(test_config(&mock_server.uri()));
    let outcome = fetch_posts(&session, &request(100, None)).await;

    let ids: Vec<&str> = outcome.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2"]);
    assert_eq!(outcome.crawl.stop, StopReason::EmptyPage);
    assert_eq!(outcome.crawl.pages, 2);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2, "no third page may be requested");

    // One page delay between page one and page two
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(3)]);
}

#[tokio::test]
async fn test_rate_limit_retries_same_cursor() {
    let mock_server = MockServer::start().await;

    // First attempt at page two is rate limited
    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .and(query_param("after", "t3_a"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    // Retry of page two succeeds and ends the listing
    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .and(query_param("after", "t3_a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            vec![text_post("b1", "rust", Some(LONG_BODY))],
            None,
        )))
        .with_priority(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            vec![text_post("a1", "rust", Some(LONG_BODY))],
            Some("t3_a"),
        )))
        .mount(&mock_server)
        .await;

    let (session, clock) = test_session(test_config(&mock_server.uri()));
    let outcome = fetch_posts(&session, &request(100, None)).await;

    assert_eq!(outcome.posts.len(), 2);
    assert_eq!(outcome.crawl.stop, StopReason::EndOfListing);
    assert_eq!(outcome.crawl.pages, 2, "the 429 is not counted as a page");
    assert_eq!(outcome.crawl.rate_limited, 1);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].url, requests[2].url, "retry must repeat the request");
    assert!(requests[2].url.query().unwrap_or("").contains("after=t3_a"));

    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_secs(3), Duration::from_secs(600)]
    );
}

#[tokio::test]
async fn test_rate_limit_on_first_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            vec![text_post("a1", "rust", Some(LONG_BODY))],
            None,
        )))
        .mount(&mock_server)
        .await;

    let (session, clock) = test_session(test_config(&mock_server.uri()));
    let outcome = fetch_posts(&session, &request(100, None)).await;

    assert_eq!(outcome.posts.len(), 1);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, requests[1].url);
    assert!(!requests[1].url.query().unwrap_or("").contains("after="));

    assert_eq!(clock.sleeps(), vec![Duration::from_secs(600)]);
}

#[tokio::test]
async fn test_server_error_keeps_partial_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .and(query_param("after", "t3_a"))
        .respond_with(ResponseTemplate::new(503))
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            vec![text_post("a1", "rust", Some(LONG_BODY))],
            Some("t3_a"),
        )))
        .mount(&mock_server)
        .await;

    let (session, _clock) = test_session(test_config(&mock_server.uri()));
    let outcome = fetch_posts(&session, &request(100, None)).await;

    assert_eq!(outcome.posts.len(), 1);
    assert_eq!(outcome.crawl.stop, StopReason::HttpStatus(503));
    assert!(outcome.crawl.stop.is_abort());
}

#[tokio::test]
async fn test_malformed_page_aborts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (session, _clock) = test_session(test_config(&mock_server.uri()));
    let outcome = fetch_posts(&session, &request(100, None)).await;

    assert!(outcome.posts.is_empty());
    assert!(matches!(outcome.crawl.stop, StopReason::Malformed(_)));
}

#[tokio::test]
async fn test_retry_cap_stops_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server.uri());
    config.client.max_rate_limit_retries = Some(2);
    let (session, clock) = test_session(config);

    let outcome = fetch_posts(&session, &request(100, None)).await;

    assert_eq!(outcome.crawl.stop, StopReason::RetryBudgetExhausted);
    assert_eq!(outcome.crawl.rate_limited, 3);
    assert_eq!(outcome.crawl.pages, 0);
    assert_eq!(clock.total_slept(), Duration::from_secs(1200));
}

#[tokio::test]
async fn test_cancelled_before_start_makes_no_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let cancel = CancelFlag::new();
    cancel.cancel();
    let (session, _clock) = test_session_with_cancel(test_config(&mock_server.uri()), cancel);

    let outcome = fetch_posts(&session, &request(10, None)).await;

    assert_eq!(outcome.crawl.stop, StopReason::Cancelled);
    assert_eq!(outcome.crawl.pages, 0);
}

#[tokio::test]
async fn test_target_reached_mid_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            vec![
                text_post("a1", "rust", Some(LONG_BODY)),
                text_post("a2", "rust", Some(LONG_BODY)),
                text_post("a3", "rust", Some(LONG_BODY)),
            ],
            Some("t3_more"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (session, clock) = test_session(test_config(&mock_server.uri()));
    let outcome = fetch_posts(&session, &request(2, None)).await;

    assert_eq!(outcome.posts.len(), 2);
    assert_eq!(outcome.crawl.stop, StopReason::TargetReached);
    assert_eq!(outcome.crawl.items, 2);
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn test_zero_target_makes_no_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (session, _clock) = test_session(test_config(&mock_server.uri()));
    let outcome = fetch_posts(&session, &request(0, None)).await;

    assert!(outcome.posts.is_empty());
    assert_eq!(outcome.crawl.stop, StopReason::TargetReached);
}

#[tokio::test]
async fn test_filters_hold_for_every_record() {
    let mock_server = MockServer::start().await;

    let short = "too short to keep";
    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            vec![
                text_post("keep1", "StockMarket", Some(LONG_BODY)),
                text_post("other", "investing", Some(LONG_BODY)),
                link_post("link", "stockmarket"),
                text_post("removed", "StockMarket", Some("[removed]")),
                text_post("deleted", "stockmarket", Some("[deleted]")),
                text_post("null", "StockMarket", None),
                text_post("empty", "StockMarket", Some("")),
                text_post("short", "StockMarket", Some(short)),
                text_post("keep2", "STOCKMARKET", Some(LONG_BODY)),
            ],
            None,
        )))
        .mount(&mock_server)
        .await;

    let (session, _clock) = test_session(test_config(&mock_server.uri()));
    let outcome = fetch_posts(&session, &request(100, Some("stockmarket"))).await;

    let ids: Vec<&str> = outcome.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["keep1", "keep2"]);

    for post in &outcome.posts {
        assert_eq!(post.subreddit.to_lowercase(), "stockmarket");
        assert_eq!(post.word_count, word_count(&post.body));
        assert!(post.word_count >= 15);
        assert!(!["", "[removed]", "[deleted]"].contains(&post.body.as_str()));
        assert_eq!(post.date, "2023-11-14");
    }
}

#[tokio::test]
async fn test_requests_carry_user_agent_and_page_size() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .and(query_param("limit", "25"))
        .and(wiremock::matchers::header("user-agent", "TestSieve/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (session, _clock) = test_session(test_config(&mock_server.uri()));
    let outcome = fetch_posts(&session, &request(5, None)).await;

    assert_eq!(outcome.crawl.stop, StopReason::EmptyPage);
}

#[tokio::test]
async fn test_bad_item_keeps_earlier_items() {
    let mock_server = MockServer::start().await;

    let mut bad = text_post("bad", "rust", Some(LONG_BODY));
    bad["title"] = serde_json::Value::Null;

    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            vec![
                text_post("a1", "rust", Some(LONG_BODY)),
                bad,
                text_post("a3", "rust", Some(LONG_BODY)),
            ],
            Some("t3_more"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (session, _clock) = test_session(test_config(&mock_server.uri()));
    let outcome = fetch_posts(&session, &request(10, None)).await;

    let ids: Vec<&str> = outcome.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a1"]);
    assert_eq!(outcome.crawl.items, 1);
    assert_eq!(outcome.crawl.pages, 1);
    assert!(matches!(outcome.crawl.stop, StopReason::Malformed(_)));
}

/// Clock that raises the cancel flag the first time anything waits on it
struct InterruptingClock {
    cancel: CancelFlag,
}

#[async_trait]
impl Clock for InterruptingClock {
    fn now(&self) -> DateTime<Utc> {
        common::start_time()
    }

    async fn sleep(&self, _duration: Duration) {
        self.cancel.cancel();
    }
}

#[tokio::test]
async fn test_interrupt_during_page_delay_saves_partial_posts() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .and(query_param("after", "t3_p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            vec![text_post("b1", "rust", Some(LONG_BODY))],
            None,
        )))
        .with_priority(1)
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SUBMITTED))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            vec![
                text_post("a1", "rust", Some(LONG_BODY)),
                text_post("a2", "rust", Some(LONG_BODY)),
            ],
            Some("t3_p1"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cancel = CancelFlag::new();
    let clock = Arc::new(InterruptingClock {
        cancel: cancel.clone(),
    });
    let session = Session::with_clock(test_config(&mock_server.uri()), clock, cancel).unwrap();

    let outcome = run_fetch(&session, &request(10, Some("rust")), output.path())
        .await
        .unwrap();

    assert_eq!(outcome.posts.len(), 2);
    assert_eq!(outcome.crawl.stop, StopReason::Cancelled);

    let saved = outcome.saved.expect("partial posts should be saved");
    assert_eq!(saved.json, output.path().join("posts_alice_rust.json"));
    assert!(saved.csv.is_file());
}
