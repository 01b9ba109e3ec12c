//! Parlor - Interactive chat session library
//!
//! This library provides the core functionality for the Parlor chat CLI:
//! session management, debounced search and suggestion feeds, message
//! composition, and mock-backed providers for replies, search, and
//! completions.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Chat sessions, messages, and the authoritative store
//! - `composer`: Draft handling with debounced search and suggestion feeds
//! - `providers`: Reply, search, completion, and history provider traits
//!   plus their mock implementations
//! - `debounce`: Trailing-edge debounce primitive for async pipelines
//! - `auth`: Authentication provider trait and mock registry
//! - `notify`: Toast notification sink
//! - `attachments`: Blob-to-URL attachment storage
//! - `export`: Paginated transcript export
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `repl`: Interactive terminal front end
//!
//! # Example
//!
//! ```no_run
//! use parlor::config::Config;
//! use parlor::repl::Repl;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/parlor.yaml")?;
//!     config.validate()?;
//!     Repl::new(config).run().await
//! }
//! ```

pub mod attachments;
pub mod auth;
pub mod cli;
pub mod composer;
pub mod config;
pub mod debounce;
pub mod error;
pub mod export;
pub mod notify;
pub mod providers;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use composer::Composer;
pub use config::Config;
pub use debounce::Debouncer;
pub use error::{ParlorError, Result};
pub use session::{ChatSession, ChatStore, Message, Role};
