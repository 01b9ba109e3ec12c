//! Session export
//!
//! Renders a [`ChatSession`] into a paginated transcript: title and
//! export-timestamp header, a separator, then each message as a role
//! label (`You:` / `Assistant:`), wrapped body text, and an attachment
//! marker where present. The artifact is written under a sanitized
//! filename derived from the session title. A JSON transcript of the raw
//! session is available as an alternative format.

use crate::error::{ParlorError, Result};
use crate::session::{ChatSession, Role};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Lines available per page
pub const PAGE_LINES: usize = 48;

/// Wrap column for message bodies
pub const WRAP_COLUMNS: usize = 80;

/// Marker appended below messages that carry an attachment
const ATTACHMENT_MARKER: &str = "[Attachment included]";

/// Output format for an exported session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Paginated plain-text transcript
    Text,
    /// Pretty-printed JSON of the raw session
    Json,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

/// A rendered, paginated transcript
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    /// Session title carried into the header
    pub title: String,
    /// Timestamp stamped into the header
    pub exported_at: DateTime<Utc>,
    /// Pages of layout lines
    pub pages: Vec<Vec<String>>,
}

impl ExportedDocument {
    /// Joins all pages into one string, separated by form feeds
    pub fn to_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\u{c}\n")
    }
}

/// Lays out a session as a paginated transcript
///
/// # Examples
///
/// ```
/// use parlor::export::render_session;
/// use parlor::session::{ChatSession, Message};
///
/// let mut session = ChatSession::new("Rust questions");
/// session.push_message(Message::user("What is ownership?"));
/// let doc = render_session(&session);
/// assert_eq!(doc.title, "Rust questions");
/// assert!(!doc.pages.is_empty());
/// ```
pub fn render_session(session: &ChatSession) -> ExportedDocument {
    let exported_at = Utc::now();

    let mut header = vec![
        session.title.clone(),
        format!("Exported on {}", exported_at.format("%Y-%m-%d %H:%M:%S UTC")),
        "-".repeat(WRAP_COLUMNS),
        String::new(),
    ];

    let mut pages: Vec<Vec<String>> = Vec::new();
    let mut current = Vec::new();
    current.append(&mut header);

    for message in &session.messages {
        let mut block = Vec::new();
        block.push(match message.role {
            Role::User => "You:".to_string(),
            Role::Assistant => "Assistant:".to_string(),
        });
        block.extend(wrap_text(&message.content, WRAP_COLUMNS));
        if message.attachment_url.is_some() {
            block.push(ATTACHMENT_MARKER.to_string());
        }
        block.push(String::new());

        // Keep a message block together when it fits a fresh page
        let remaining = PAGE_LINES - current.len();
        if block.len() > remaining && block.len() <= PAGE_LINES {
            pages.push(std::mem::take(&mut current));
        }
        for line in block {
            if current.len() >= PAGE_LINES {
                pages.push(std::mem::take(&mut current));
            }
            current.push(line);
        }
    }

    if !current.is_empty() {
        pages.push(current);
    }

    ExportedDocument {
        title: session.title.clone(),
        exported_at,
        pages,
    }
}

/// Derives a filesystem-safe base name from a session title
///
/// Every character outside `[a-z0-9]` becomes an underscore and the
/// result is lowercased, matching the download naming convention.
///
/// # Examples
///
/// ```
/// use parlor::export::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My Chat! #1"), "my_chat___1");
/// ```
pub fn sanitize_filename(title: &str) -> String {
    // Unwrap is fine: the pattern is a compile-time constant.
    let pattern = Regex::new("[^a-zA-Z0-9]").unwrap();
    pattern.replace_all(title, "_").to_lowercase()
}

/// Exports a session to a file in the given directory
///
/// The filename is `<sanitized-title>_chat.<ext>`. Returns the path of
/// the written file.
///
/// # Errors
///
/// Returns an error when the session has no messages, serialization
/// fails, or the file cannot be written.
pub fn export_session(
    session: &ChatSession,
    directory: &Path,
    format: ExportFormat,
) -> Result<PathBuf> {
    if session.messages.is_empty() {
        return Err(ParlorError::Export("session has no messages".to_string()).into());
    }

    let contents = match format {
        ExportFormat::Text => render_session(session).to_text(),
        ExportFormat::Json => serde_json::to_string_pretty(session)?,
    };

    let filename = format!(
        "{}_chat.{}",
        sanitize_filename(&session.title),
        format.extension()
    );
    let path = directory.join(filename);
    std::fs::write(&path, contents)?;
    tracing::info!("Exported session {} to {}", session.id, path.display());
    Ok(path)
}

/// Wraps text to the given column, preserving explicit newlines
///
/// Words longer than the column are hard-split.
fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        if raw_line.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let word_len = word.chars().count();
            if !current.is_empty() && current.chars().count() + 1 + word_len > columns {
                lines.push(std::mem::take(&mut current));
            }
            if word_len > columns {
                // Hard-split an overlong word across lines
                let mut chunk = String::new();
                for ch in word.chars() {
                    if chunk.chars().count() == columns {
                        lines.push(std::mem::take(&mut chunk));
                    }
                    chunk.push(ch);
                }
                current = chunk;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}
