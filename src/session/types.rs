//! Core chat data types
//!
//! This module defines the message and session structures shared by the
//! session store, the composer, and the export utilities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder title given to freshly created sessions
///
/// Auto-titling only fires while a session still carries this title.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Maximum number of characters kept when deriving a title from a message
pub const TITLE_MAX_CHARS: usize = 30;

/// Role of a message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message written by the signed-in user
    User,
    /// Message produced by the assistant
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message
///
/// Messages are immutable once created; the session store only ever
/// appends them to a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for this message
    pub id: Uuid,
    /// Message body text
    pub content: String,
    /// Author role
    pub role: Role,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Optional URL of an attached file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use parlor::session::{Message, Role};
    ///
    /// let msg = Message::user("Hello there");
    /// assert_eq!(msg.role, Role::User);
    /// assert!(msg.attachment_url.is_none());
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Role::User)
    }

    /// Creates a new assistant message
    ///
    /// # Examples
    ///
    /// ```
    /// use parlor::session::{Message, Role};
    ///
    /// let msg = Message::assistant("How can I help?");
    /// assert_eq!(msg.role, Role::Assistant);
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, Role::Assistant)
    }

    /// Creates a new message with the given role
    pub fn new(content: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            role,
            created_at: Utc::now(),
            attachment_url: None,
        }
    }

    /// Attaches a stored file URL to this message (builder style)
    ///
    /// # Examples
    ///
    /// ```
    /// use parlor::session::Message;
    ///
    /// let msg = Message::user("See attached")
    ///     .with_attachment(Some("mock://attachments/abc/report.txt".to_string()));
    /// assert!(msg.attachment_url.is_some());
    /// ```
    pub fn with_attachment(mut self, attachment_url: Option<String>) -> Self {
        self.attachment_url = attachment_url;
        self
    }
}

/// A single conversation thread with ordered messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique identifier for this session
    pub id: Uuid,
    /// Display title; mutable until auto-titling fires
    pub title: String,
    /// Ordered message sequence, append-only
    pub messages: Vec<Message>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Advances on every message append
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Creates an empty session with the given title
    ///
    /// # Examples
    ///
    /// ```
    /// use parlor::session::ChatSession;
    ///
    /// let session = ChatSession::new("New Conversation");
    /// assert!(session.messages.is_empty());
    /// assert_eq!(session.created_at, session.updated_at);
    /// ```
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a message and advances `updated_at`
    ///
    /// This is the only way a session gains content; existing messages
    /// are never reordered or edited.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Assigns a derived title if this session still carries the placeholder
    ///
    /// Returns true when the title changed. Fires at most once per session
    /// because a derived title no longer matches the placeholder.
    ///
    /// # Examples
    ///
    /// ```
    /// use parlor::session::ChatSession;
    ///
    /// let mut session = ChatSession::new("New Conversation");
    /// assert!(session.auto_title("Tell me about lifetimes"));
    /// assert!(!session.auto_title("Second message"));
    /// assert_eq!(session.title, "Tell me about lifetimes");
    /// ```
    pub fn auto_title(&mut self, content: &str) -> bool {
        if self.title != DEFAULT_TITLE || content.is_empty() {
            return false;
        }
        self.title = derive_title(content);
        true
    }

    /// Returns the number of messages in this session
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if this session has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Derives a session title from message content
///
/// Takes the first [`TITLE_MAX_CHARS`] characters and appends an ellipsis
/// when the content was truncated.
///
/// # Examples
///
/// ```
/// use parlor::session::derive_title;
///
/// assert_eq!(derive_title("Short question"), "Short question");
/// let long = "Hello there, this is a long test message exceeding thirty chars";
/// assert_eq!(derive_title(long), "Hello there, this is a long te...");
/// ```
pub fn derive_title(content: &str) -> String {
    let mut title: String = content.chars().take(TITLE_MAX_CHARS).collect();
    if content.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}
