//! Chat sessions: data types and the authoritative store

pub mod store;
pub mod types;

pub use store::ChatStore;
pub use types::{derive_title, ChatSession, Message, Role, DEFAULT_TITLE, TITLE_MAX_CHARS};
