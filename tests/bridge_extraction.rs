mod common;

use std::sync::Arc;

use common::{bridge_for, SEGMENTS};
use yt_summarizer::extractor::selectors;
use yt_summarizer::page::ScriptedPage;
use yt_summarizer::TabMessenger;

#[tokio::test]
async fn test_first_request_injects_agent_and_extracts() {
    let page = Arc::new(ScriptedPage::watch_page("Rust in Production", &SEGMENTS));
    let bridge = bridge_for(&page);
    assert!(!bridge.tab().is_instrumented());

    let result = bridge.request_extraction().await.unwrap();

    assert!(result.is_success());
    assert_eq!(
        result.transcript(),
        Some("Welcome back today we talk about borrow checking")
    );
    assert_eq!(result.video_title(), "Rust in Production");
    assert_eq!(result.video_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    assert!(bridge.tab().is_instrumented());
    assert_eq!(bridge.tab().extraction_runs(), 1);

    let clicks = page.clicks();
    assert_eq!(clicks.first(), Some(&selectors::EXPANDER[0]));
    assert!(clicks.contains(&selectors::TRANSCRIPT_BUTTON[0]));
    assert_eq!(clicks.last(), Some(&selectors::CLOSE_PANEL[0]));
}

#[tokio::test]
async fn test_second_request_reuses_agent() {
    let page = Arc::new(ScriptedPage::watch_page("Talk", &SEGMENTS));
    let bridge = bridge_for(&page);

    bridge.request_extraction().await.unwrap();
    bridge.tab().inject_agent().await.unwrap();
    let second = bridge.request_extraction().await.unwrap();

    assert!(second.is_success());
    assert_eq!(bridge.tab().extraction_runs(), 2);
}

#[tokio::test]
async fn test_missing_transcript_comes_back_as_failed_result() {
    let page = Arc::new(
        ScriptedPage::new("https://www.youtube.com/watch?v=abc")
            .with_element(selectors::TITLE[0], "No Captions Here"),
    );
    let bridge = bridge_for(&page);

    let result = bridge.request_extraction().await.unwrap();

    assert!(!result.is_success());
    assert!(result.transcript().is_none());
    assert_eq!(result.video_title(), "No Captions Here");
    assert!(result.error().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_non_video_page_is_rejected_without_clicks() {
    let page = Arc::new(ScriptedPage::new("https://www.youtube.com/feed/subscriptions"));
    let bridge = bridge_for(&page);

    let result = bridge.request_extraction().await.unwrap();

    assert_eq!(result.error(), Some("Not on a YouTube video page"));
    assert!(page.clicks().is_empty());
    assert_eq!(page.elapsed(), std::time::Duration::ZERO);
}

#[tokio::test]
async fn test_result_serializes_in_wire_shape() {
    let page = Arc::new(ScriptedPage::watch_page("Talk", &["one", "two"]));
    let bridge = bridge_for(&page);

    let result = bridge.request_extraction().await.unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["transcript"], "one two");
    assert_eq!(json["videoTitle"], "Talk");
    assert!(json.get("error").is_none());
}
