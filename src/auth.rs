//! Authentication collaborator
//!
//! The session store treats "no signed-in user" as a hard precondition
//! failure: every mutating operation silently no-ops without one. The
//! baseline ships an in-memory [`MockAuth`]; a real deployment implements
//! [`AuthProvider`] against an actual identity service.

use crate::error::{ParlorError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for this user
    pub id: Uuid,
    /// Sign-in email address
    pub email: String,
    /// Optional avatar image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Authentication operations exposed to the chat engine
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns the currently signed-in user, if any
    fn current_user(&self) -> Option<User>;

    /// Signs in with email and password
    ///
    /// # Errors
    ///
    /// Returns an error for unknown accounts or wrong passwords.
    async fn sign_in(&self, email: &str, password: &str) -> Result<User>;

    /// Creates an account and signs it in
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered.
    async fn sign_up(&self, email: &str, password: &str) -> Result<User>;

    /// Signs in through an external OAuth provider
    ///
    /// # Errors
    ///
    /// Returns an error if the OAuth flow fails.
    async fn sign_in_with_oauth(&self, provider: &str) -> Result<User>;

    /// Clears the current session
    fn sign_out(&self);
}

/// Validates a signup form before touching the auth provider
///
/// Rejected input never reaches the provider and mutates no state.
///
/// # Errors
///
/// Returns [`ParlorError::Validation`] when the passwords differ or the
/// email is blank.
///
/// # Examples
///
/// ```
/// use parlor::auth::validate_signup;
///
/// assert!(validate_signup("a@b.com", "secret", "secret").is_ok());
/// assert!(validate_signup("a@b.com", "secret", "other").is_err());
/// ```
pub fn validate_signup(email: &str, password: &str, confirm_password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(ParlorError::Validation("Email is required".to_string()).into());
    }
    if password != confirm_password {
        return Err(ParlorError::Validation("Passwords do not match".to_string()).into());
    }
    Ok(())
}

/// In-memory account registry with a single active session
#[derive(Debug, Default)]
pub struct MockAuth {
    accounts: Mutex<HashMap<String, StoredAccount>>,
    current: Mutex<Option<User>>,
}

#[derive(Debug, Clone)]
struct StoredAccount {
    id: Uuid,
    password: String,
}

impl MockAuth {
    /// Creates an empty registry with nobody signed in
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with one account already signed in
    ///
    /// Convenience for tests and the REPL's `--email` shortcut.
    pub fn signed_in(email: &str) -> Self {
        let auth = Self::new();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            avatar_url: None,
        };
        auth.accounts.lock().unwrap().insert(
            email.to_string(),
            StoredAccount {
                id: user.id,
                password: String::new(),
            },
        );
        *auth.current.lock().unwrap() = Some(user);
        auth
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    fn current_user(&self) -> Option<User> {
        self.current.lock().unwrap().clone()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let account = {
            let accounts = self.accounts.lock().unwrap();
            accounts.get(email).cloned()
        };
        let account = account.ok_or_else(|| {
            ParlorError::Authentication(format!("No account for {}", email))
        })?;
        if account.password != password {
            return Err(ParlorError::Authentication("Invalid password".to_string()).into());
        }
        let user = User {
            id: account.id,
            email: email.to_string(),
            avatar_url: None,
        };
        *self.current.lock().unwrap() = Some(user.clone());
        tracing::info!("Signed in as {}", email);
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(
                ParlorError::Authentication(format!("Account already exists: {}", email)).into(),
            );
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            avatar_url: None,
        };
        accounts.insert(
            email.to_string(),
            StoredAccount {
                id: user.id,
                password: password.to_string(),
            },
        );
        drop(accounts);
        *self.current.lock().unwrap() = Some(user.clone());
        tracing::info!("Created account for {}", email);
        Ok(user)
    }

    async fn sign_in_with_oauth(&self, provider: &str) -> Result<User> {
        if provider.trim().is_empty() {
            return Err(
                ParlorError::Authentication("OAuth provider name is empty".to_string()).into(),
            );
        }
        let email = format!("user@{}.oauth", provider.to_lowercase());
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .entry(email.clone())
            .or_insert_with(|| StoredAccount {
                id: Uuid::new_v4(),
                password: String::new(),
            })
            .clone();
        drop(accounts);
        let user = User {
            id: account.id,
            email,
            avatar_url: None,
        };
        *self.current.lock().unwrap() = Some(user.clone());
        tracing::info!("Signed in via OAuth provider {}", provider);
        Ok(user)
    }

    fn sign_out(&self) {
        *self.current.lock().unwrap() = None;
        tracing::info!("Signed out");
    }
}
