//! Message composer
//!
//! Orchestrates the draft text, the debounced search and suggestion
//! feeds, and submission into the [`ChatStore`]. An accepted submit
//! clears the draft, drops the suggestion, and hides the results panel;
//! a rejected one leaves the composer untouched. Selecting a search
//! result only appends a reference line to the draft.

pub mod search;
pub mod suggest;

pub use search::{SearchFeed, SearchSnapshot};
pub use suggest::{SuggestionFeed, MIN_DRAFT_CHARS};

use crate::attachments::AttachmentStore;
use crate::error::Result;
use crate::providers::{CompletionProvider, SearchProvider, SearchResult};
use crate::session::ChatStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Draft-and-submit front end over the session store
pub struct Composer {
    store: Arc<ChatStore>,
    attachments: Arc<dyn AttachmentStore>,
    search: SearchFeed,
    suggest: SuggestionFeed,
    draft: Mutex<String>,
    pending_attachment: Mutex<Option<String>>,
    results_hidden: AtomicBool,
}

impl Composer {
    /// Creates a composer wired to the given collaborators
    ///
    /// `delay` is the shared debounce interval for both feeds.
    pub fn new(
        store: Arc<ChatStore>,
        attachments: Arc<dyn AttachmentStore>,
        search_provider: Arc<dyn SearchProvider>,
        completion_provider: Arc<dyn CompletionProvider>,
        delay: Duration,
    ) -> Self {
        Self {
            store,
            attachments,
            search: SearchFeed::new(search_provider, delay),
            suggest: SuggestionFeed::new(completion_provider, delay),
            draft: Mutex::new(String::new()),
            pending_attachment: Mutex::new(None),
            results_hidden: AtomicBool::new(false),
        }
    }

    /// Replaces the draft text and feeds both providers
    pub fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.search.set_query(text.clone());
        self.suggest.set_draft(text.clone());
        self.results_hidden.store(false, Ordering::SeqCst);
        *self.draft.lock().unwrap() = text;
    }

    /// Returns the current draft text
    pub fn draft(&self) -> String {
        self.draft.lock().unwrap().clone()
    }

    /// Submits the trimmed draft and any pending attachment
    ///
    /// Returns true when the store accepted the message; only then are
    /// the draft, the suggestion, and the pending attachment cleared and
    /// the results panel hidden. A blank draft with no attachment, or a
    /// store rejection (nobody signed in), leaves everything in place.
    pub async fn submit(&self) -> bool {
        let content = self.draft().trim().to_string();
        let attachment = self.pending_attachment.lock().unwrap().clone();
        if content.is_empty() && attachment.is_none() {
            return false;
        }

        if !self.store.send_message(&content, attachment).await {
            return false;
        }

        *self.pending_attachment.lock().unwrap() = None;
        self.set_draft(String::new());
        self.suggest.clear();
        self.results_hidden.store(true, Ordering::SeqCst);
        true
    }

    /// Handles an Enter key event; Shift+Enter inserts a newline instead
    pub async fn handle_enter(&self, shift: bool) -> bool {
        if shift {
            let current = self.draft();
            self.set_draft(format!("{}\n", current));
            return false;
        }
        self.submit().await
    }

    /// Appends a reference line for the chosen result to the draft
    ///
    /// Does not submit; the results panel is hidden afterwards. The
    /// reference line is message text, not a query, so the search feed is
    /// left alone; only the suggestion feed sees the updated draft.
    pub fn apply_search_result(&self, result: &SearchResult) {
        let updated = format!(
            "{}\n\nReferencing: {} ({})",
            self.draft(),
            result.title,
            result.url
        );
        self.suggest.set_draft(updated.clone());
        *self.draft.lock().unwrap() = updated;
        self.results_hidden.store(true, Ordering::SeqCst);
    }

    /// Submits the current suggestion text as the message
    ///
    /// Returns true when a suggestion existed and the store accepted it;
    /// the draft and suggestion are cleared only on acceptance.
    pub async fn accept_suggestion(&self) -> bool {
        let Some(suggestion) = self.suggest.suggestion() else {
            return false;
        };
        if !self.store.send_message(&suggestion, None).await {
            return false;
        }
        self.set_draft(String::new());
        self.suggest.clear();
        self.results_hidden.store(true, Ordering::SeqCst);
        true
    }

    /// Stores a blob and keeps its URL for the next submit
    ///
    /// # Errors
    ///
    /// Returns an error if the attachment store rejects the blob.
    pub fn attach(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let url = self.attachments.store(filename, bytes)?;
        *self.pending_attachment.lock().unwrap() = Some(url.clone());
        Ok(url)
    }

    /// Returns the pending attachment URL, if any
    pub fn pending_attachment(&self) -> Option<String> {
        self.pending_attachment.lock().unwrap().clone()
    }

    /// Latest committed search results
    pub fn search_results(&self) -> Vec<SearchResult> {
        self.search.results()
    }

    /// True when the results panel should be shown
    pub fn results_visible(&self) -> bool {
        !self.results_hidden.load(Ordering::SeqCst) && !self.search.results().is_empty()
    }

    /// True while a search request is outstanding
    pub fn searching(&self) -> bool {
        self.search.loading()
    }

    /// Current AI suggestion, if any
    pub fn suggestion(&self) -> Option<String> {
        self.suggest.suggestion()
    }

    /// True while a completion request is outstanding
    pub fn thinking(&self) -> bool {
        self.suggest.thinking()
    }
}
