//! Chat session store
//!
//! Owns the authoritative collection of chat sessions and the identity of
//! the current one. All mutation goes through this store: session
//! creation, user/assistant message appends, auto-titling, selection, and
//! deletion. The current session is tracked by id only, so there is no
//! duplicated session object to reconcile after a mutation.
//!
//! Collaborators are passed in explicitly: an [`AuthProvider`] gating all
//! mutations, a [`NotificationSink`] for surfacing async failures, and a
//! [`ReplyProvider`] generating the simulated assistant reply.

use crate::auth::AuthProvider;
use crate::notify::{NotificationSink, Toast};
use crate::providers::{ReplyProvider, SessionSource};
use crate::session::types::{ChatSession, Message, DEFAULT_TITLE};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Authoritative store for chat sessions
///
/// Sessions are ordered most-recently-created first. At most one session
/// is "current"; if the collection is empty, none is. Sends against the
/// same session are serialized with a per-session async mutex so a reply
/// can never interleave between another send's user and assistant
/// messages.
pub struct ChatStore {
    auth: Arc<dyn AuthProvider>,
    sink: Arc<dyn NotificationSink>,
    replies: Arc<dyn ReplyProvider>,
    greeting: String,
    state: Mutex<StoreState>,
    send_locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
    in_flight: AtomicUsize,
}

#[derive(Debug, Default)]
struct StoreState {
    sessions: Vec<ChatSession>,
    current: Option<Uuid>,
}

impl ChatStore {
    /// Creates a store with the given collaborators
    ///
    /// `greeting` seeds the first assistant message of every new session.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        sink: Arc<dyn NotificationSink>,
        replies: Arc<dyn ReplyProvider>,
        greeting: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            sink,
            replies,
            greeting: greeting.into(),
            state: Mutex::new(StoreState::default()),
            send_locks: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Creates a new session seeded with the assistant greeting
    ///
    /// The session is prepended to the collection and becomes current.
    /// No-op (returns None) when nobody is signed in.
    pub fn create_session(&self) -> Option<Uuid> {
        if self.auth.current_user().is_none() {
            tracing::debug!("create_session ignored: no signed-in user");
            return None;
        }

        let mut session = ChatSession::new(DEFAULT_TITLE);
        session.push_message(Message::assistant(self.greeting.clone()));
        let id = session.id;

        let mut state = self.state.lock().unwrap();
        state.sessions.insert(0, session);
        state.current = Some(id);
        tracing::info!("Created session {}", id);
        Some(id)
    }

    /// Sends a user message and awaits the simulated assistant reply
    ///
    /// Returns true once the user message is committed; that commit
    /// stands even if reply generation fails afterwards, with the failure
    /// surfacing as an error toast. Returns false without mutating
    /// anything when the content is blank with no attachment, or when
    /// nobody is signed in. Creates a session first when none is current.
    /// While the title still equals the placeholder, a successful cycle
    /// replaces it with the first 30 characters of the triggering content.
    pub async fn send_message(&self, content: &str, attachment_url: Option<String>) -> bool {
        if content.trim().is_empty() && attachment_url.is_none() {
            return false;
        }
        if self.auth.current_user().is_none() {
            tracing::debug!("send_message ignored: no signed-in user");
            return false;
        }

        let session_id = match self.resolve_target_session() {
            Some(id) => id,
            None => return false,
        };

        // One in-flight send per session id
        let send_lock = self.send_lock(session_id);
        let _guard = send_lock.lock().await;

        {
            let mut state = self.state.lock().unwrap();
            let Some(session) = state.session_mut(session_id) else {
                // Deleted while waiting for the send lock
                return false;
            };
            session.push_message(Message::user(content).with_attachment(attachment_url));
        }

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let outcome = self.replies.reply(content).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match outcome {
            Ok(reply) => {
                let mut state = self.state.lock().unwrap();
                // The session may have been deleted mid-reply; a late
                // reply must not resurrect it.
                if let Some(session) = state.session_mut(session_id) {
                    session.push_message(Message::assistant(reply));
                    session.auto_title(content);
                }
            }
            Err(error) => {
                tracing::error!("Reply generation failed: {:#}", error);
                self.sink
                    .notify(Toast::error("Error", "Failed to get a response"));
            }
        }
        true
    }

    /// Makes the session with the given id current
    ///
    /// No-op if the id is unknown; the current selection is unchanged.
    pub fn select_session(&self, id: Uuid) {
        let mut state = self.state.lock().unwrap();
        if state.sessions.iter().any(|s| s.id == id) {
            state.current = Some(id);
        } else {
            tracing::debug!("select_session ignored: unknown id {}", id);
        }
    }

    /// Removes the session with the given id
    ///
    /// When the current session is deleted, the first remaining session
    /// becomes current, or none if the collection is now empty.
    pub fn delete_session(&self, id: Uuid) {
        let mut state = self.state.lock().unwrap();
        state.sessions.retain(|s| s.id != id);
        if state.current == Some(id) {
            state.current = state.sessions.first().map(|s| s.id);
        }
        drop(state);
        self.send_locks.lock().unwrap().remove(&id);
        tracing::info!("Deleted session {}", id);
    }

    /// Reloads the signed-in user's sessions from a [`SessionSource`]
    ///
    /// When signed out, the collection and selection are cleared. When
    /// signed in, the fetched history replaces the collection; the first
    /// session becomes current unless the existing selection survived the
    /// reload. Load failures are toasted and leave the store unchanged.
    pub async fn refresh(&self, source: &dyn SessionSource) {
        let Some(user) = self.auth.current_user() else {
            let mut state = self.state.lock().unwrap();
            state.sessions.clear();
            state.current = None;
            return;
        };

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let fetched = source.fetch_sessions(user.id).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match fetched {
            Ok(sessions) => {
                let mut state = self.state.lock().unwrap();
                let keep_current = state
                    .current
                    .filter(|id| sessions.iter().any(|s| s.id == *id));
                state.current = keep_current.or_else(|| sessions.first().map(|s| s.id));
                state.sessions = sessions;
                tracing::info!("Loaded {} sessions", state.sessions.len());
            }
            Err(error) => {
                tracing::error!("Failed to fetch sessions: {:#}", error);
                self.sink
                    .notify(Toast::error("Error", "Failed to load your chat history"));
            }
        }
    }

    /// Returns a snapshot of all sessions, most recent first
    pub fn sessions(&self) -> Vec<ChatSession> {
        self.state.lock().unwrap().sessions.clone()
    }

    /// Returns the id of the current session, if any
    pub fn current_id(&self) -> Option<Uuid> {
        self.state.lock().unwrap().current
    }

    /// Returns a snapshot of the current session, if any
    pub fn current_session(&self) -> Option<ChatSession> {
        let state = self.state.lock().unwrap();
        let id = state.current?;
        state.sessions.iter().find(|s| s.id == id).cloned()
    }

    /// Returns a snapshot of the session with the given id
    pub fn session(&self, id: Uuid) -> Option<ChatSession> {
        let state = self.state.lock().unwrap();
        state.sessions.iter().find(|s| s.id == id).cloned()
    }

    /// True while a reply cycle or history load is in flight
    pub fn busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Returns the number of sessions
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }

    /// Returns true if the store holds no sessions
    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().sessions.is_empty()
    }

    /// Returns the current session id, creating a session when none exists
    fn resolve_target_session(&self) -> Option<Uuid> {
        {
            let state = self.state.lock().unwrap();
            if let Some(id) = state.current {
                if state.sessions.iter().any(|s| s.id == id) {
                    return Some(id);
                }
            }
        }
        self.create_session()
    }

    fn send_lock(&self, id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        self.send_locks
            .lock()
            .unwrap()
            .entry(id)
            .or_default()
            .clone()
    }
}

impl StoreState {
    fn session_mut(&mut self, id: Uuid) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }
}
