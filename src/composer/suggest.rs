//! Debounced AI suggestion feed
//!
//! Watches the composer draft through a [`Debouncer`] and asks a
//! [`CompletionProvider`] for a single suggested completion once the draft
//! is long enough. The same generation-token guard as the search feed
//! keeps late responses from superseded requests, manual clears, or a
//! torn-down feed from mutating state.

use crate::debounce::Debouncer;
use crate::providers::CompletionProvider;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Minimum trimmed draft length before a completion is requested
pub const MIN_DRAFT_CHARS: usize = 5;

#[derive(Debug, Clone, Default)]
struct SuggestState {
    suggestion: Option<String>,
    thinking: bool,
}

/// Debounced draft-to-suggestion pipeline
pub struct SuggestionFeed {
    debouncer: Debouncer<String>,
    state: Arc<Mutex<SuggestState>>,
    generation: Arc<AtomicU64>,
    live: Arc<AtomicBool>,
    dispatcher: JoinHandle<()>,
}

impl SuggestionFeed {
    /// Creates a feed over the given provider
    ///
    /// `delay` is the debounce interval; drafts whose trimmed length is
    /// `MIN_DRAFT_CHARS` or fewer never issue a request.
    pub fn new(provider: Arc<dyn CompletionProvider>, delay: Duration) -> Self {
        let debouncer = Debouncer::new(delay);
        let state = Arc::new(Mutex::new(SuggestState::default()));
        let generation = Arc::new(AtomicU64::new(0));
        let live = Arc::new(AtomicBool::new(true));

        let mut settled = debouncer.subscribe();
        let dispatcher = {
            let state = state.clone();
            let generation = generation.clone();
            let live = live.clone();
            tokio::spawn(async move {
                while settled.changed().await.is_ok() {
                    let draft: String = match settled.borrow_and_update().clone() {
                        Some(draft) => draft,
                        None => continue,
                    };
                    // Bump the generation and mutate state in one critical
                    // section, so an in-flight commit can never interleave
                    // between the two.
                    let token;
                    {
                        let mut snapshot = state.lock().unwrap();
                        token = generation.fetch_add(1, Ordering::SeqCst) + 1;
                        if draft.trim().chars().count() <= MIN_DRAFT_CHARS {
                            snapshot.suggestion = None;
                            snapshot.thinking = false;
                            continue;
                        }
                        snapshot.thinking = true;
                    }

                    let provider = provider.clone();
                    let state = state.clone();
                    let generation = generation.clone();
                    let live = live.clone();
                    tokio::spawn(async move {
                        let outcome = provider.complete(&draft).await;
                        if !live.load(Ordering::SeqCst) {
                            return;
                        }
                        // The token comparison must hold while the commit
                        // happens; checking it outside the lock would let a
                        // concurrent clear() slip between check and commit.
                        let mut snapshot = state.lock().unwrap();
                        if generation.load(Ordering::SeqCst) != token {
                            tracing::debug!("Discarding stale completion for {:?}", draft);
                            return;
                        }
                        match outcome {
                            Ok(text) => snapshot.suggestion = Some(text),
                            Err(error) => {
                                // Suggestions are best-effort; a failure just
                                // means no ghost text this time.
                                tracing::warn!("Completion failed: {:#}", error);
                            }
                        }
                        snapshot.thinking = false;
                    });
                }
            })
        };

        Self {
            debouncer,
            state,
            generation,
            live,
            dispatcher,
        }
    }

    /// Feeds the latest draft text
    pub fn set_draft(&self, draft: impl Into<String>) {
        self.debouncer.update(draft.into());
    }

    /// Returns the current suggestion, if any
    pub fn suggestion(&self) -> Option<String> {
        self.state.lock().unwrap().suggestion.clone()
    }

    /// True while a completion request is outstanding
    pub fn thinking(&self) -> bool {
        self.state.lock().unwrap().thinking
    }

    /// Drops the current suggestion immediately
    ///
    /// Also invalidates any in-flight request so a late response cannot
    /// resurrect the suggestion after the draft was sent.
    pub fn clear(&self) {
        // The bump and the null must be one atomic step from the point of
        // view of a committing response task.
        let mut snapshot = self.state.lock().unwrap();
        self.generation.fetch_add(1, Ordering::SeqCst);
        snapshot.suggestion = None;
        snapshot.thinking = false;
    }
}

impl Drop for SuggestionFeed {
    fn drop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
        self.dispatcher.abort();
    }
}
