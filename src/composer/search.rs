//! Debounced search feed
//!
//! Wires a [`Debouncer`] to a [`SearchProvider`] and keeps the latest
//! results, a loading flag, and the last error. Responses carry the
//! generation of the query that issued them; only the response matching
//! the newest generation may commit, so stale results from superseded or
//! torn-down requests never overwrite fresher state.

use crate::debounce::Debouncer;
use crate::providers::{SearchProvider, SearchResult};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Observable state of the search feed
#[derive(Debug, Clone, Default)]
pub struct SearchSnapshot {
    /// Latest committed result list
    pub results: Vec<SearchResult>,
    /// True while a request for the newest query is unresolved
    pub loading: bool,
    /// Message of the most recent failure, cleared on the next request
    pub error: Option<String>,
}

/// Debounced query-to-results pipeline
pub struct SearchFeed {
    debouncer: Debouncer<String>,
    state: Arc<Mutex<SearchSnapshot>>,
    live: Arc<AtomicBool>,
    dispatcher: JoinHandle<()>,
}

impl SearchFeed {
    /// Creates a feed over the given provider
    ///
    /// `delay` is the debounce interval applied to query updates.
    pub fn new(provider: Arc<dyn SearchProvider>, delay: Duration) -> Self {
        let debouncer = Debouncer::new(delay);
        let state = Arc::new(Mutex::new(SearchSnapshot::default()));
        let live = Arc::new(AtomicBool::new(true));
        let generation = Arc::new(AtomicU64::new(0));

        let mut settled = debouncer.subscribe();
        let dispatcher = {
            let state = state.clone();
            let live = live.clone();
            tokio::spawn(async move {
                while settled.changed().await.is_ok() {
                    let query: String = match settled.borrow_and_update().clone() {
                        Some(query) => query,
                        None => continue,
                    };
                    // Bump the generation and mutate state in one critical
                    // section, so an in-flight commit can never interleave
                    // between the two.
                    let token;
                    {
                        let mut snapshot = state.lock().unwrap();
                        token = generation.fetch_add(1, Ordering::SeqCst) + 1;
                        if query.trim().is_empty() {
                            snapshot.results.clear();
                            snapshot.loading = false;
                            snapshot.error = None;
                            continue;
                        }
                        snapshot.loading = true;
                        snapshot.error = None;
                    }

                    let provider = provider.clone();
                    let state = state.clone();
                    let generation = generation.clone();
                    let live = live.clone();
                    tokio::spawn(async move {
                        let outcome = provider.search(&query).await;
                        // A newer query or feed teardown invalidates this
                        // response.
                        if !live.load(Ordering::SeqCst) {
                            return;
                        }
                        // The token comparison must hold while the commit
                        // happens, so a newer dispatch cannot slip between
                        // check and commit.
                        let mut snapshot = state.lock().unwrap();
                        if generation.load(Ordering::SeqCst) != token {
                            tracing::debug!("Discarding stale search response for {:?}", query);
                            return;
                        }
                        match outcome {
                            Ok(results) => {
                                snapshot.results = results;
                                snapshot.error = None;
                            }
                            Err(error) => {
                                tracing::warn!("Search failed: {:#}", error);
                                snapshot.results.clear();
                                snapshot.error = Some(error.to_string());
                            }
                        }
                        snapshot.loading = false;
                    });
                }
            })
        };

        Self {
            debouncer,
            state,
            live,
            dispatcher,
        }
    }

    /// Feeds the latest query text
    pub fn set_query(&self, query: impl Into<String>) {
        self.debouncer.update(query.into());
    }

    /// Returns a copy of the current feed state
    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.lock().unwrap().clone()
    }

    /// Returns the latest committed results
    pub fn results(&self) -> Vec<SearchResult> {
        self.state.lock().unwrap().results.clone()
    }

    /// True while a request is outstanding
    pub fn loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    /// Returns the last recorded error message
    pub fn error(&self) -> Option<String> {
        self.state.lock().unwrap().error.clone()
    }
}

impl Drop for SearchFeed {
    fn drop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
        self.dispatcher.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParlorError, Result};
    use crate::providers::MockSearchProvider;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;
    use tokio::task::yield_now;
    use tokio::time::advance;

    const DELAY: Duration = Duration::from_millis(50);

    /// Counts requests and answers with one result naming the query
    struct CountingSearch {
        calls: Arc<AtomicUsize>,
        latency: Duration,
        fail: bool,
    }

    #[async_trait]
    impl SearchProvider for CountingSearch {
        async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            if self.fail {
                return Err(ParlorError::Search("backend down".to_string()).into());
            }
            Ok(vec![SearchResult {
                id: "1".to_string(),
                title: query.to_string(),
                url: "https://example.com".to_string(),
                snippet: String::new(),
            }])
        }
    }

    fn counting_feed(
        latency: Duration,
        fail: bool,
    ) -> (SearchFeed, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = Arc::new(CountingSearch {
            calls: calls.clone(),
            latency,
            fail,
        });
        (SearchFeed::new(provider, DELAY), calls)
    }

    async fn settle(steps: u64) {
        for _ in 0..steps {
            yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_issues_no_request() {
        let (feed, calls) = counting_feed(Duration::ZERO, false);
        feed.set_query("   ");
        yield_now().await;
        advance(DELAY).await;
        settle(4).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let snapshot = feed.snapshot();
        assert!(snapshot.results.is_empty());
        assert!(!snapshot.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_resolves_results() {
        let (feed, calls) = counting_feed(Duration::ZERO, false);
        feed.set_query("lifetimes");
        yield_now().await;
        advance(DELAY).await;
        settle(4).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let snapshot = feed.snapshot();
        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(snapshot.results[0].title, "lifetimes");
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_flag_during_request() {
        let (feed, _) = counting_feed(Duration::from_millis(100), false);
        feed.set_query("borrowck");
        yield_now().await;
        advance(DELAY).await;
        settle(4).await;
        assert!(feed.loading());

        advance(Duration::from_millis(100)).await;
        settle(4).await;
        assert!(!feed.loading());
        assert_eq!(feed.results().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_issues_one_request() {
        let (feed, calls) = counting_feed(Duration::ZERO, false);
        feed.set_query("r");
        yield_now().await;
        advance(Duration::from_millis(10)).await;
        feed.set_query("ru");
        yield_now().await;
        advance(Duration::from_millis(10)).await;
        feed.set_query("rust");
        yield_now().await;
        advance(DELAY).await;
        settle(4).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(feed.results()[0].title, "rust");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_does_not_overwrite() {
        let (feed, calls) = counting_feed(Duration::from_millis(100), false);

        // First query settles at t=50, resolves at t=150
        feed.set_query("first");
        yield_now().await;
        advance(DELAY).await;
        settle(4).await;

        // Second query settles at t=110, resolves at t=210
        advance(Duration::from_millis(10)).await;
        feed.set_query("second");
        yield_now().await;
        advance(DELAY).await;
        settle(4).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Let both responses land
        advance(Duration::from_millis(200)).await;
        settle(4).await;

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(snapshot.results[0].title, "second");
        assert!(!snapshot.loading);
    }

    /// Parks the first request until released; later requests resolve
    /// immediately
    struct GatedSearch {
        gate: Arc<Notify>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SearchProvider for GatedSearch {
        async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.gate.notified().await;
            }
            Ok(vec![SearchResult {
                id: "1".to_string(),
                title: query.to_string(),
                url: "https://example.com".to_string(),
                snippet: String::new(),
            }])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_parked_older_response_cannot_overwrite_newer() {
        let gate = Arc::new(Notify::new());
        let provider = Arc::new(GatedSearch {
            gate: gate.clone(),
            calls: Arc::new(AtomicUsize::new(0)),
        });
        let feed = SearchFeed::new(provider, DELAY);

        // First request parks inside the provider
        feed.set_query("older");
        yield_now().await;
        advance(DELAY).await;
        settle(4).await;
        assert!(feed.loading());

        // Second request resolves and commits while the first is parked
        feed.set_query("newer");
        yield_now().await;
        advance(DELAY).await;
        settle(4).await;
        assert_eq!(feed.results()[0].title, "newer");

        // Releasing the first response must not overwrite the newer results
        gate.notify_one();
        settle(8).await;
        assert_eq!(feed.results()[0].title, "newer");
        assert!(!feed.loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_clears_results_and_records_error() {
        let (feed, _) = counting_feed(Duration::ZERO, true);
        feed.set_query("anything");
        yield_now().await;
        advance(DELAY).await;
        settle(4).await;

        let snapshot = feed.snapshot();
        assert!(snapshot.results.is_empty());
        assert!(!snapshot.loading);
        assert!(snapshot.error.as_deref().unwrap().contains("backend down"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_after_results_clears() {
        let (feed, _) = counting_feed(Duration::ZERO, false);
        feed.set_query("rust");
        yield_now().await;
        advance(DELAY).await;
        settle(4).await;
        assert_eq!(feed.results().len(), 1);

        feed.set_query("");
        yield_now().await;
        advance(DELAY).await;
        settle(4).await;
        assert!(feed.results().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_provider_end_to_end() {
        let provider = Arc::new(MockSearchProvider::new(Duration::ZERO));
        let feed = SearchFeed::new(provider, DELAY);
        feed.set_query("traits");
        yield_now().await;
        advance(DELAY).await;
        settle(4).await;

        let results = feed.results();
        assert_eq!(results.len(), 3);
        assert!(results[0].title.contains("traits"));
    }
}
