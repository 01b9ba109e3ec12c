//! Provider abstractions for Parlor
//!
//! This module defines the async traits the chat engine talks to: reply
//! generation, draft completion, search, and the session source used to
//! load a user's existing history. The baseline ships mock implementations
//! only; a real backend implements the same traits.

pub mod mock;

pub use mock::{MockBackend, MockCompletionProvider, MockReplyProvider, MockSearchProvider};

use crate::error::Result;
use crate::session::ChatSession;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single ranked search result
///
/// Ephemeral: results are shown in the composer and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Unique identifier within one result list
    pub id: String,
    /// Result title shown in the panel
    pub title: String,
    /// Link target
    pub url: String,
    /// Short excerpt explaining the match
    pub snippet: String,
}

/// Generates an assistant reply for a user message
///
/// The contract is one input string to eventually one reply string, or a
/// failure signaled to the caller. Implementations must not mutate any
/// session state; the store owns commits.
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    /// Produces the assistant reply for the given user content
    ///
    /// # Errors
    ///
    /// Returns an error if reply generation fails; the triggering user
    /// message stays committed regardless.
    async fn reply(&self, content: &str) -> Result<String>;
}

/// Produces at most one draft completion suggestion
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Suggests a completion for the given draft text
    ///
    /// # Errors
    ///
    /// Returns an error if the completion backend fails.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Resolves a query string to a ranked result list
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Searches for the given query
    ///
    /// Callers are expected to skip blank queries; implementations may
    /// still return an empty list for them.
    ///
    /// # Errors
    ///
    /// Returns an error if the search backend fails.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>>;
}

/// Loads the existing sessions for an authenticated user
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Fetches all sessions owned by `user_id`, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    async fn fetch_sessions(&self, user_id: Uuid) -> Result<Vec<ChatSession>>;
}
