//! User-facing notification sink
//!
//! Async failures (reply generation, history loads) are surfaced as toasts
//! rather than propagated errors. The engine only depends on the
//! [`NotificationSink`] trait; the REPL installs a [`TerminalSink`], tests
//! install a [`MemorySink`] and assert on what was recorded.

use colored::Colorize;
use std::sync::Mutex;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational message
    Info,
    /// Something failed; the user may want to retry
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single notification shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Short headline
    pub title: String,
    /// Longer explanation
    pub description: String,
    /// Display severity
    pub severity: Severity,
}

impl Toast {
    /// Creates an error toast
    ///
    /// # Examples
    ///
    /// ```
    /// use parlor::notify::{Severity, Toast};
    ///
    /// let toast = Toast::error("Error", "Failed to get a response");
    /// assert_eq!(toast.severity, Severity::Error);
    /// ```
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Error,
        }
    }

    /// Creates an informational toast
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }
}

/// Receives notifications destined for the user
pub trait NotificationSink: Send + Sync {
    /// Delivers one toast
    fn notify(&self, toast: Toast);
}

/// Prints toasts to the terminal with severity coloring
#[derive(Debug, Default)]
pub struct TerminalSink;

impl NotificationSink for TerminalSink {
    fn notify(&self, toast: Toast) {
        let headline = match toast.severity {
            Severity::Info => toast.title.cyan(),
            Severity::Error => toast.title.red().bold(),
        };
        println!("{}: {}", headline, toast.description);
        tracing::debug!(severity = %toast.severity, "toast: {}", toast.title);
    }
}

/// Records toasts in memory for inspection
///
/// Used by tests and headless runs where no terminal is attached.
#[derive(Debug, Default)]
pub struct MemorySink {
    toasts: Mutex<Vec<Toast>>,
}

impl MemorySink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far
    pub fn recorded(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    /// Returns the number of recorded toasts
    pub fn len(&self) -> usize {
        self.toasts.lock().unwrap().len()
    }

    /// Returns true if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.toasts.lock().unwrap().is_empty()
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_error_constructor() {
        let toast = Toast::error("Error", "Failed to load your chat history");
        assert_eq!(toast.title, "Error");
        assert_eq!(toast.description, "Failed to load your chat history");
        assert_eq!(toast.severity, Severity::Error);
    }

    #[test]
    fn test_toast_info_constructor() {
        let toast = Toast::info("Exported", "Saved transcript");
        assert_eq!(toast.severity, Severity::Info);
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.notify(Toast::info("first", "a"));
        sink.notify(Toast::error("second", "b"));

        let recorded = sink.recorded();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].title, "first");
        assert_eq!(recorded[1].severity, Severity::Error);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Info.to_string(), "info");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
