//! End-to-end collection runs against in-memory upstreams and a temp directory

use crate::support::{market, now, points, StubHistory, StubListing};
use chrono::Duration;
use poly_history::collect::{CollectError, Collector};
use poly_history::config::{HistoryErrorPolicy, WindowPolicy};
use poly_history::data::{HistoryRecord, JsonHistoryStore};
use poly_history::market::MarketFilter;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

fn filter() -> MarketFilter {
    MarketFilter::new(WindowPolicy::AnyResolution, Duration::days(30))
}

fn collector(
    listing: &StubListing,
    history: &StubHistory,
    dir: &TempDir,
    policy: HistoryErrorPolicy,
) -> Collector<StubListing, StubHistory, JsonHistoryStore> {
    let store = JsonHistoryStore::open(dir.path()).unwrap();
    Collector::new(listing.clone(), history.clone(), store, filter(), policy)
}

fn json_files(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".json"))
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_single_page_writes_only_non_empty_histories() {
    let listing = StubListing::default().page(
        "",
        vec![
            market(json!({
                "market_slug": "will-it-rain",
                "end_date_iso": "2024-05-22T00:00:00Z",
                "tokens": [
                    {"token_id": "111", "outcome": "Yes"},
                    {"token_id": "222", "outcome": "No"}
                ]
            })),
            market(json!({
                "market_slug": "no-tokens",
                "end_date_iso": "2024-05-25T00:00:00Z"
            })),
        ],
        Some("LTE="),
    );
    let history = StubHistory::default()
        .with("111", points(&[0.4, 0.6, 0.9]))
        .with("222", Vec::new());
    let dir = TempDir::new().unwrap();

    let stats = assert_ok!(
        collector(&listing, &history, &dir, HistoryErrorPolicy::Skip)
            .run(now())
            .await
    );

    assert_eq!(json_files(&dir), vec!["will-it-rain_111.json"]);
    assert_eq!(stats.pages, 1);
    assert_eq!(stats.markets_seen, 2);
    assert_eq!(stats.markets_eligible, 1);
    assert_eq!(stats.files_written, 1);
    assert_eq!(stats.empty_histories, 1);
    assert_eq!(listing.requested(), vec![""]);

    let record = HistoryRecord::load(dir.path().join("will-it-rain_111.json")).unwrap();
    assert_eq!(record.history.len(), 3);
    assert_eq!(record.outcome.as_deref(), Some("Yes"));
}

#[tokio::test]
async fn test_follows_cursor_until_terminal_sentinel() {
    let eligible = |slug: &str, token: &str| {
        market(json!({
            "market_slug": slug,
            "end_date": "2024-05-30T12:00:00Z",
            "tokens": [{"token_id": token, "outcome": "Yes"}]
        }))
    };
    let listing = StubListing::default()
        .page("", vec![eligible("first", "1")], Some("MTAw"))
        .page("MTAw", vec![eligible("second", "2")], Some("LTE="));
    let history = StubHistory::default()
        .with("1", points(&[0.5, 0.5]))
        .with("2", points(&[0.2, 0.3]));
    let dir = TempDir::new().unwrap();

    let stats = assert_ok!(
        collector(&listing, &history, &dir, HistoryErrorPolicy::Skip)
            .run(now())
            .await
    );

    assert_eq!(listing.requested(), vec!["", "MTAw"]);
    assert_eq!(stats.pages, 2);
    assert_eq!(json_files(&dir), vec!["first_1.json", "second_2.json"]);
}

#[tokio::test]
async fn test_second_run_skips_stored_tokens() {
    let listing = StubListing::default().page(
        "",
        vec![market(json!({
            "slug": "election/2024 winner",
            "end_date_iso": "2024-05-20T00:00:00Z",
            "tokens": [{"token_id": "9", "outcome": "Yes"}]
        }))],
        None,
    );
    let history = StubHistory::default().with("9", points(&[0.1, 0.2, 0.3]));
    let dir = TempDir::new().unwrap();

    assert_ok!(
        collector(&listing, &history, &dir, HistoryErrorPolicy::Skip)
            .run(now())
            .await
    );
    let path = dir.path().join("election_2024_winner_9.json");
    let first = fs::read(&path).unwrap();
    assert_eq!(history.calls(), vec!["9"]);

    let stats = assert_ok!(
        collector(&listing, &history, &dir, HistoryErrorPolicy::Skip)
            .run(now())
            .await
    );

    assert_eq!(history.calls(), vec!["9"]);
    assert_eq!(stats.tokens_skipped_existing, 1);
    assert_eq!(stats.files_written, 0);
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[tokio::test]
async fn test_markets_outside_window_are_not_fetched() {
    let listing = StubListing::default().page(
        "",
        vec![
            market(json!({
                "market_slug": "long-ago",
                "end_date_iso": "2024-04-01T00:00:00Z",
                "tokens": [{"token_id": "old", "outcome": "Yes"}]
            })),
            market(json!({
                "market_slug": "undated",
                "tokens": [{"token_id": "nodate", "outcome": "Yes"}]
            })),
        ],
        Some("LTE="),
    );
    let history = StubHistory::default();
    let dir = TempDir::new().unwrap();

    let stats = assert_ok!(
        collector(&listing, &history, &dir, HistoryErrorPolicy::Skip)
            .run(now())
            .await
    );

    assert!(history.calls().is_empty());
    assert_eq!(stats.markets_eligible, 0);
    assert!(json_files(&dir).is_empty());
}

#[tokio::test]
async fn test_listing_failure_keeps_earlier_files() {
    let listing = StubListing::default()
        .page(
            "",
            vec![market(json!({
                "market_slug": "kept",
                "end_date_iso": "2024-05-28T00:00:00Z",
                "tokens": [{"token_id": "1", "outcome": "No"}]
            }))],
            Some("next"),
        )
        .failing("next", 502);
    let history = StubHistory::default().with("1", points(&[0.7, 0.1]));
    let dir = TempDir::new().unwrap();

    let err = assert_err!(
        collector(&listing, &history, &dir, HistoryErrorPolicy::Skip)
            .run(now())
            .await
    );

    assert!(matches!(err, CollectError::UpstreamListing(_)));
    assert_eq!(json_files(&dir), vec!["kept_1.json"]);
}

#[tokio::test]
async fn test_history_failure_policy() {
    let listing = StubListing::default().page(
        "",
        vec![market(json!({
            "market_slug": "flaky",
            "end_date_iso": "2024-05-28T00:00:00Z",
            "tokens": [
                {"token_id": "bad", "outcome": "Yes"},
                {"token_id": "good", "outcome": "No"}
            ]
        }))],
        None,
    );
    let history = StubHistory::default()
        .failing("bad", 500)
        .with("good", points(&[0.3, 0.2]));

    let skip_dir = TempDir::new().unwrap();
    let stats = assert_ok!(
        collector(&listing, &history, &skip_dir, HistoryErrorPolicy::Skip)
            .run(now())
            .await
    );
    assert_eq!(stats.history_failures, 1);
    assert_eq!(stats.failures[0].0, "bad");
    assert_eq!(json_files(&skip_dir), vec!["flaky_good.json"]);

    let abort_dir = TempDir::new().unwrap();
    let err = assert_err!(
        collector(&listing, &history, &abort_dir, HistoryErrorPolicy::Abort)
            .run(now())
            .await
    );
    assert!(matches!(err, CollectError::UpstreamHistory { ref token_id, .. } if token_id == "bad"));
    assert!(json_files(&abort_dir).is_empty());
}
