//! Interactive terminal front end
//!
//! A readline-based loop over the session store and composer. Slash
//! commands manage sessions and authentication; any other line becomes a
//! draft that is submitted through the composer.

use crate::attachments::LocalAttachmentStore;
use crate::auth::{AuthProvider, MockAuth};
use crate::composer::Composer;
use crate::config::Config;
use crate::error::Result;
use crate::export::{export_session, ExportFormat};
use crate::notify::TerminalSink;
use crate::providers::{
    MockBackend, MockCompletionProvider, MockReplyProvider, MockSearchProvider,
};
use crate::session::{ChatStore, Role};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;
use std::sync::Arc;

/// A parsed line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Create a new session and make it current
    New,
    /// List sessions, newest first
    List,
    /// Select the Nth listed session (1-based)
    Select(usize),
    /// Delete the Nth listed session (1-based)
    Delete(usize),
    /// Export the current session
    Export(ExportFormat),
    /// Sign in with email and password
    Login { email: String, password: String },
    /// Create an account and sign in
    Signup { email: String, password: String },
    /// Sign out
    Logout,
    /// Reload sessions from the backend
    Refresh,
    /// Show command help
    Help,
    /// Leave the prompt
    Quit,
    /// A plain chat message
    Message(String),
    /// Unrecognized or malformed slash command
    Unknown(String),
}

/// Parses a trimmed input line into a [`ReplCommand`]
///
/// Lines not starting with `/` are chat messages.
///
/// # Examples
///
/// ```
/// use parlor::repl::{parse_command, ReplCommand};
///
/// assert_eq!(parse_command("/new"), ReplCommand::New);
/// assert_eq!(parse_command("/select 2"), ReplCommand::Select(2));
/// assert_eq!(
///     parse_command("hi there"),
///     ReplCommand::Message("hi there".to_string())
/// );
/// ```
pub fn parse_command(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return ReplCommand::Message(trimmed.to_string());
    }

    let mut parts = trimmed.split_whitespace();
    let head = parts.next().unwrap_or("");
    match head {
        "/new" => ReplCommand::New,
        "/list" => ReplCommand::List,
        "/select" => match parts.next().and_then(|n| n.parse().ok()) {
            Some(index) if index >= 1 => ReplCommand::Select(index),
            _ => ReplCommand::Unknown("usage: /select <number>".to_string()),
        },
        "/delete" => match parts.next().and_then(|n| n.parse().ok()) {
            Some(index) if index >= 1 => ReplCommand::Delete(index),
            _ => ReplCommand::Unknown("usage: /delete <number>".to_string()),
        },
        "/export" => match parts.next() {
            None | Some("text") => ReplCommand::Export(ExportFormat::Text),
            Some("json") => ReplCommand::Export(ExportFormat::Json),
            Some(other) => ReplCommand::Unknown(format!("unknown export format: {}", other)),
        },
        "/login" => match (parts.next(), parts.next()) {
            (Some(email), Some(password)) => ReplCommand::Login {
                email: email.to_string(),
                password: password.to_string(),
            },
            _ => ReplCommand::Unknown("usage: /login <email> <password>".to_string()),
        },
        "/signup" => match (parts.next(), parts.next()) {
            (Some(email), Some(password)) => ReplCommand::Signup {
                email: email.to_string(),
                password: password.to_string(),
            },
            _ => ReplCommand::Unknown("usage: /signup <email> <password>".to_string()),
        },
        "/logout" => ReplCommand::Logout,
        "/refresh" => ReplCommand::Refresh,
        "/help" => ReplCommand::Help,
        "/quit" | "/exit" => ReplCommand::Quit,
        other => ReplCommand::Unknown(format!("unknown command: {}", other)),
    }
}

/// Wires the store, composer, and mock backends together for the prompt
pub struct Repl {
    config: Config,
    auth: Arc<MockAuth>,
    backend: MockBackend,
    store: Arc<ChatStore>,
    composer: Composer,
}

impl Repl {
    /// Builds a REPL from the given configuration
    pub fn new(config: Config) -> Self {
        let auth = Arc::new(MockAuth::new());
        let store = Arc::new(ChatStore::new(
            auth.clone(),
            Arc::new(TerminalSink),
            Arc::new(MockReplyProvider::new(config.reply_latency())),
            &config.chat.greeting,
        ));
        let composer = Composer::new(
            store.clone(),
            Arc::new(LocalAttachmentStore::new()),
            Arc::new(MockSearchProvider::new(config.call_latency())),
            Arc::new(MockCompletionProvider::new(config.call_latency())),
            config.debounce(),
        );
        let backend = MockBackend::new(config.fetch_latency());
        Self {
            config,
            auth,
            backend,
            store,
            composer,
        }
    }

    /// Signs in before the prompt starts
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be created or signed in.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        if self.auth.sign_in(email, password).await.is_err() {
            self.auth.sign_up(email, password).await?;
        }
        Ok(())
    }

    /// Runs the interactive loop until `/quit` or end of input
    ///
    /// # Errors
    ///
    /// Returns an error only for terminal I/O failures; command failures
    /// are printed and the loop continues.
    pub async fn run(&self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        print_banner();

        loop {
            match rl.readline(&self.prompt()) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;
                    if !self.dispatch(parse_command(trimmed)).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(error) => return Err(error.into()),
            }
        }

        println!("{}", "Goodbye!".cyan());
        Ok(())
    }

    fn prompt(&self) -> String {
        let who = match self.auth.current_user() {
            Some(user) => user.email,
            None => "signed out".to_string(),
        };
        format!("[{}] > ", who.cyan())
    }

    /// Handles one command; returns false when the loop should stop
    async fn dispatch(&self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::New => {
                match self.store.create_session() {
                    Some(id) => println!("Created session {}", id),
                    None => println!("{}", "Sign in first (/login or /signup)".yellow()),
                }
            }
            ReplCommand::List => self.print_sessions(),
            ReplCommand::Select(index) => {
                match self.session_id_at(index) {
                    Some(id) => {
                        self.store.select_session(id);
                        self.print_current_session();
                    }
                    None => println!("{}", "No such session".yellow()),
                }
            }
            ReplCommand::Delete(index) => {
                match self.session_id_at(index) {
                    Some(id) => {
                        self.store.delete_session(id);
                        println!("Deleted session {}", index);
                    }
                    None => println!("{}", "No such session".yellow()),
                }
            }
            ReplCommand::Export(format) => self.export_current(format),
            ReplCommand::Login { email, password } => {
                match self.auth.sign_in(&email, &password).await {
                    Ok(user) => println!("Signed in as {}", user.email.green()),
                    Err(error) => println!("{}", format!("Sign in failed: {:#}", error).red()),
                }
            }
            ReplCommand::Signup { email, password } => {
                match self.auth.sign_up(&email, &password).await {
                    Ok(user) => println!("Account created for {}", user.email.green()),
                    Err(error) => println!("{}", format!("Sign up failed: {:#}", error).red()),
                }
            }
            ReplCommand::Logout => {
                self.auth.sign_out();
                println!("Signed out");
            }
            ReplCommand::Refresh => {
                self.store.refresh(&self.backend).await;
                self.print_sessions();
            }
            ReplCommand::Help => print_help(),
            ReplCommand::Quit => return false,
            ReplCommand::Message(content) => self.send(&content).await,
            ReplCommand::Unknown(message) => println!("{}", message.yellow()),
        }
        true
    }

    async fn send(&self, content: &str) {
        if self.auth.current_user().is_none() {
            println!("{}", "Sign in first (/login or /signup)".yellow());
            return;
        }
        self.composer.set_draft(content);
        if self.composer.submit().await {
            if let Some(session) = self.store.current_session() {
                if let Some(reply) = session
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.role == Role::Assistant)
                {
                    println!("{} {}", "Assistant:".green().bold(), reply.content);
                }
            }
        }
    }

    fn session_id_at(&self, index: usize) -> Option<uuid::Uuid> {
        self.store.sessions().get(index - 1).map(|s| s.id)
    }

    fn print_sessions(&self) {
        let sessions = self.store.sessions();
        if sessions.is_empty() {
            println!("No sessions yet. Start one with /new.");
            return;
        }
        let current = self.store.current_id();
        for (position, session) in sessions.iter().enumerate() {
            let marker = if Some(session.id) == current { "*" } else { " " };
            println!(
                "{} {}. {} ({} messages)",
                marker,
                position + 1,
                session.title.bold(),
                session.len()
            );
        }
    }

    fn print_current_session(&self) {
        let Some(session) = self.store.current_session() else {
            println!("No current session");
            return;
        };
        println!("{}", session.title.bold());
        for message in &session.messages {
            let label = match message.role {
                Role::User => "You:".cyan().bold(),
                Role::Assistant => "Assistant:".green().bold(),
            };
            println!("{} {}", label, message.content);
        }
    }

    fn export_current(&self, format: ExportFormat) {
        let Some(session) = self.store.current_session() else {
            println!("{}", "No current session to export".yellow());
            return;
        };
        let directory = Path::new(&self.config.export.output_dir);
        match export_session(&session, directory, format) {
            Ok(path) => println!("Exported to {}", path.display().to_string().green()),
            Err(error) => println!("{}", format!("Export failed: {:#}", error).red()),
        }
    }
}

fn print_banner() {
    println!("{}", "parlor - interactive chat".cyan().bold());
    println!("Type a message to chat, or /help for commands.\n");
}

fn print_help() {
    println!("Commands:");
    println!("  /new                      create a session");
    println!("  /list                     list sessions, newest first");
    println!("  /select <n>               switch to session n");
    println!("  /delete <n>               delete session n");
    println!("  /export [text|json]       export the current session");
    println!("  /login <email> <pass>     sign in");
    println!("  /signup <email> <pass>    create an account");
    println!("  /logout                   sign out");
    println!("  /refresh                  reload sessions from the backend");
    println!("  /quit                     leave");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_message() {
        assert_eq!(
            parse_command("what is rust"),
            ReplCommand::Message("what is rust".to_string())
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("/new"), ReplCommand::New);
        assert_eq!(parse_command("/list"), ReplCommand::List);
        assert_eq!(parse_command("/logout"), ReplCommand::Logout);
        assert_eq!(parse_command("/refresh"), ReplCommand::Refresh);
        assert_eq!(parse_command("/help"), ReplCommand::Help);
        assert_eq!(parse_command("/quit"), ReplCommand::Quit);
        assert_eq!(parse_command("/exit"), ReplCommand::Quit);
    }

    #[test]
    fn test_parse_select_and_delete() {
        assert_eq!(parse_command("/select 3"), ReplCommand::Select(3));
        assert_eq!(parse_command("/delete 1"), ReplCommand::Delete(1));
        assert!(matches!(parse_command("/select"), ReplCommand::Unknown(_)));
        assert!(matches!(parse_command("/select 0"), ReplCommand::Unknown(_)));
        assert!(matches!(
            parse_command("/delete abc"),
            ReplCommand::Unknown(_)
        ));
    }

    #[test]
    fn test_parse_export_formats() {
        assert_eq!(parse_command("/export"), ReplCommand::Export(ExportFormat::Text));
        assert_eq!(
            parse_command("/export text"),
            ReplCommand::Export(ExportFormat::Text)
        );
        assert_eq!(
            parse_command("/export json"),
            ReplCommand::Export(ExportFormat::Json)
        );
        assert!(matches!(
            parse_command("/export pdf"),
            ReplCommand::Unknown(_)
        ));
    }

    #[test]
    fn test_parse_login_signup() {
        assert_eq!(
            parse_command("/login a@b.com secret"),
            ReplCommand::Login {
                email: "a@b.com".to_string(),
                password: "secret".to_string(),
            }
        );
        assert_eq!(
            parse_command("/signup a@b.com secret"),
            ReplCommand::Signup {
                email: "a@b.com".to_string(),
                password: "secret".to_string(),
            }
        );
        assert!(matches!(
            parse_command("/login a@b.com"),
            ReplCommand::Unknown(_)
        ));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(matches!(parse_command("/nope"), ReplCommand::Unknown(_)));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_command("  /new  "), ReplCommand::New);
    }

    #[tokio::test]
    async fn test_sign_in_creates_account_when_missing() {
        let repl = Repl::new(Config::default());
        repl.sign_in("fresh@example.com", "password").await.unwrap();
        assert!(repl.auth.current_user().is_some());
    }

    #[tokio::test]
    async fn test_dispatch_quit_stops_loop() {
        let repl = Repl::new(Config::default());
        assert!(!repl.dispatch(ReplCommand::Quit).await);
        assert!(repl.dispatch(ReplCommand::Help).await);
    }
}
