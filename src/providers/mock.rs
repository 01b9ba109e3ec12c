//! Mock provider implementations
//!
//! Deterministic, in-process stand-ins for the reply, completion, search,
//! and session-source backends. Each mock sleeps for a configurable
//! latency to exercise the same async paths a real backend would.

use crate::error::{ParlorError, Result};
use crate::providers::{
    CompletionProvider, ReplyProvider, SearchProvider, SearchResult, SessionSource,
};
use crate::session::{ChatSession, Message};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;
use uuid::Uuid;

/// Default simulated latency for reply generation
pub const DEFAULT_REPLY_LATENCY: Duration = Duration::from_millis(1000);

/// Default simulated latency for search and completion calls
pub const DEFAULT_CALL_LATENCY: Duration = Duration::from_millis(500);

/// Greeting used to seed new sessions
pub const GREETING: &str = "Hello! How can I help you today?";

/// Echoes user content into a canned assistant reply after a fixed delay
///
/// A production deployment swaps this for a real completion service; the
/// store only depends on the [`ReplyProvider`] contract.
#[derive(Debug, Clone)]
pub struct MockReplyProvider {
    latency: Duration,
    fail: bool,
}

impl MockReplyProvider {
    /// Creates a reply provider with the given simulated latency
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            fail: false,
        }
    }

    /// Creates a provider that fails every request
    ///
    /// Used to exercise the store's failure path: the user message must
    /// stay committed and the failure must surface as a notification.
    pub fn failing() -> Self {
        Self {
            latency: Duration::ZERO,
            fail: true,
        }
    }
}

impl Default for MockReplyProvider {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_LATENCY)
    }
}

#[async_trait]
impl ReplyProvider for MockReplyProvider {
    async fn reply(&self, content: &str) -> Result<String> {
        tokio::time::sleep(self.latency).await;
        if self.fail {
            return Err(ParlorError::Provider("simulated reply failure".to_string()).into());
        }
        Ok(format!(
            "I received your message: \"{}\". This is a simulated response.",
            content
        ))
    }
}

/// Keyword-driven draft completion mock
#[derive(Debug, Clone)]
pub struct MockCompletionProvider {
    latency: Duration,
}

impl MockCompletionProvider {
    /// Creates a completion provider with the given simulated latency
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockCompletionProvider {
    fn default() -> Self {
        Self::new(DEFAULT_CALL_LATENCY)
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        tokio::time::sleep(self.latency).await;
        let lowered = prompt.to_lowercase();
        let suggestion = if lowered.contains("hello") {
            "Hello! How can I assist you today?".to_string()
        } else if lowered.contains("help") {
            "I'm here to help. What do you need assistance with?".to_string()
        } else if lowered.contains("weather") {
            "I don't have real-time weather data, but I can suggest checking a weather service!"
                .to_string()
        } else {
            format!(
                "I received your request: \"{}\". How can I help you with that?",
                prompt
            )
        };
        Ok(suggestion)
    }
}

/// Returns three synthetic results derived from the query text
#[derive(Debug, Clone)]
pub struct MockSearchProvider {
    latency: Duration,
}

impl MockSearchProvider {
    /// Creates a search provider with the given simulated latency
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockSearchProvider {
    fn default() -> Self {
        Self::new(DEFAULT_CALL_LATENCY)
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        tokio::time::sleep(self.latency).await;
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![
            SearchResult {
                id: "1".to_string(),
                title: format!("Result for \"{}\" - Documentation", query),
                url: "https://example.com/docs".to_string(),
                snippet: format!(
                    "This is a sample result that contains the term \"{}\" with relevant information.",
                    query
                ),
            },
            SearchResult {
                id: "2".to_string(),
                title: format!("{} - Learn More", query),
                url: "https://example.com/learn".to_string(),
                snippet: format!(
                    "Discover more about \"{}\" and related topics in our comprehensive guide.",
                    query
                ),
            },
            SearchResult {
                id: "3".to_string(),
                title: format!("Advanced {} Techniques", query),
                url: "https://example.com/advanced".to_string(),
                snippet: format!(
                    "Explore advanced techniques and strategies related to \"{}\" for better results.",
                    query
                ),
            },
        ])
    }
}

/// Serves a fixed pair of seeded sessions for any known user
///
/// Mirrors what a history fetch against a real backend would return.
#[derive(Debug, Clone)]
pub struct MockBackend {
    latency: Duration,
}

impl MockBackend {
    /// Creates a session source with the given simulated latency
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Builds the canned history returned for every user
    fn seeded_sessions() -> Vec<ChatSession> {
        let day_ago = Utc::now() - ChronoDuration::days(1);
        let half_day_ago = Utc::now() - ChronoDuration::hours(12);

        let mut first = ChatSession::new("First Conversation");
        first.created_at = day_ago;
        first.push_message(Message::assistant(GREETING));
        first.push_message(Message::user("I have a question about Rust."));
        first.push_message(Message::assistant(
            "Sure, I can help with Rust questions. What would you like to know?",
        ));

        let mut second = ChatSession::new("Learning TypeScript");
        second.created_at = half_day_ago;
        second.push_message(Message::assistant(GREETING));
        second.push_message(Message::user(
            "I want to learn TypeScript. Where should I start?",
        ));
        second.push_message(Message::assistant(
            "TypeScript is a great language to learn! I recommend starting with the official documentation...",
        ));

        vec![first, second]
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}

#[async_trait]
impl SessionSource for MockBackend {
    async fn fetch_sessions(&self, _user_id: Uuid) -> Result<Vec<ChatSession>> {
        tokio::time::sleep(self.latency).await;
        Ok(Self::seeded_sessions())
    }
}
