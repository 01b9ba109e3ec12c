//! Integration tests for the composer pipeline
//!
//! Drives the composer with the real mock providers and their default
//! latencies under a paused clock, checking the debounce, suggestion, and
//! submission behavior end to end.

use parlor::attachments::LocalAttachmentStore;
use parlor::auth::MockAuth;
use parlor::composer::Composer;
use parlor::notify::MemorySink;
use parlor::providers::{MockCompletionProvider, MockReplyProvider, MockSearchProvider};
use parlor::session::{ChatStore, Role};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::yield_now;
use tokio::time::advance;

const DEBOUNCE: Duration = Duration::from_millis(500);
const CALL_LATENCY: Duration = Duration::from_millis(500);
const REPLY_LATENCY: Duration = Duration::from_millis(1000);

fn build() -> (Composer, Arc<ChatStore>) {
    let store = Arc::new(ChatStore::new(
        Arc::new(MockAuth::signed_in("dev@example.com")),
        Arc::new(MemorySink::new()),
        Arc::new(MockReplyProvider::new(REPLY_LATENCY)),
        "Hello! How can I help you today?",
    ));
    let composer = Composer::new(
        store.clone(),
        Arc::new(LocalAttachmentStore::new()),
        Arc::new(MockSearchProvider::new(CALL_LATENCY)),
        Arc::new(MockCompletionProvider::new(CALL_LATENCY)),
        DEBOUNCE,
    );
    (composer, store)
}

async fn settle() {
    for _ in 0..8 {
        yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_typing_burst_produces_one_result_set() {
    let (composer, _store) = build();

    // A burst of keystrokes inside the debounce window
    for draft in ["r", "ru", "rus", "rust lifetimes"] {
        composer.set_draft(draft);
        yield_now().await;
        advance(Duration::from_millis(100)).await;
    }

    // Quiet period elapses, then the provider call resolves
    advance(DEBOUNCE).await;
    settle().await;
    assert!(composer.searching());

    advance(CALL_LATENCY).await;
    settle().await;

    let results = composer.search_results();
    assert_eq!(results.len(), 3);
    // Only the final draft reached the provider
    assert_eq!(
        results[0].title,
        "Result for \"rust lifetimes\" - Documentation"
    );
    assert!(!composer.searching());
}

#[tokio::test(start_paused = true)]
async fn test_newer_query_wins_over_slow_older_one() {
    let (composer, _store) = build();

    composer.set_draft("older query");
    yield_now().await;
    advance(DEBOUNCE).await;
    settle().await;

    composer.set_draft("newer query");
    yield_now().await;
    advance(DEBOUNCE).await;
    settle().await;

    // Let both provider calls resolve
    advance(CALL_LATENCY * 2).await;
    settle().await;

    let results = composer.search_results();
    assert_eq!(
        results[0].title,
        "Result for \"newer query\" - Documentation"
    );
}

#[tokio::test(start_paused = true)]
async fn test_suggestion_appears_and_submits() {
    let (composer, store) = build();
    store.create_session();

    composer.set_draft("hello from the integration test");
    yield_now().await;
    advance(DEBOUNCE).await;
    settle().await;
    assert!(composer.thinking());

    advance(CALL_LATENCY).await;
    settle().await;
    assert_eq!(
        composer.suggestion().as_deref(),
        Some("Hello! How can I assist you today?")
    );

    assert!(composer.accept_suggestion().await);
    let session = store.current_session().expect("session should exist");
    assert_eq!(session.messages[1].role, Role::User);
    assert_eq!(
        session.messages[1].content,
        "Hello! How can I assist you today?"
    );
}

#[tokio::test(start_paused = true)]
async fn test_short_draft_yields_no_suggestion() {
    let (composer, _store) = build();

    composer.set_draft("hey");
    yield_now().await;
    advance(DEBOUNCE).await;
    advance(CALL_LATENCY).await;
    settle().await;

    assert!(composer.suggestion().is_none());
    assert!(!composer.thinking());
}

#[tokio::test(start_paused = true)]
async fn test_reference_then_submit_round_trip() {
    let (composer, store) = build();
    store.create_session();

    composer.set_draft("borrow checker");
    yield_now().await;
    advance(DEBOUNCE).await;
    settle().await;
    advance(CALL_LATENCY).await;
    settle().await;
    assert!(composer.results_visible());

    let result = composer.search_results()[1].clone();
    composer.apply_search_result(&result);
    assert!(!composer.results_visible());

    let draft = composer.draft();
    assert!(draft.contains("Referencing: borrow checker - Learn More (https://example.com/learn)"));

    assert!(composer.submit().await);
    assert_eq!(composer.draft(), "");

    let session = store.current_session().expect("session should exist");
    // Greeting, user message with reference, assistant reply
    assert_eq!(session.messages.len(), 3);
    assert!(session.messages[1].content.contains("Referencing:"));
    assert_eq!(session.messages[2].role, Role::Assistant);
}

#[tokio::test(start_paused = true)]
async fn test_submit_creates_session_on_demand() {
    let (composer, store) = build();
    assert!(store.is_empty());

    composer.set_draft("first message ever");
    assert!(composer.submit().await);

    assert_eq!(store.len(), 1);
    let session = store.current_session().expect("session should exist");
    assert_eq!(session.title, "first message ever");
}

#[tokio::test(start_paused = true)]
async fn test_blank_draft_goes_nowhere() {
    let (composer, store) = build();
    store.create_session();

    composer.set_draft("   \n  ");
    assert!(!composer.submit().await);
    assert_eq!(store.current_session().unwrap().messages.len(), 1);
}
