use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::storage::{KeyValueStore, StorageError};
use crate::models::User;

/// Namespace prefix for the persisted session slots
pub const STORAGE_NAMESPACE: &str = "devorbit_auth";

/// In-memory view of the session. Only `SessionStore` constructs non-empty
/// values, and it always sets or clears both fields together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Owns the session and its persisted copy.
///
/// State lives inside a `watch` channel so every mutation is published to
/// subscribers before the mutating call returns.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { storage, state }
    }

    /// Create a store and rehydrate it from storage in one step
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let store = Self::new(storage);
        store.initialize();
        store
    }

    pub fn token_key() -> String {
        format!("{}_token", STORAGE_NAMESPACE)
    }

    pub fn user_key() -> String {
        format!("{}_user", STORAGE_NAMESPACE)
    }

    /// Load the persisted session.
    ///
    /// A half-present or unparseable session is discarded entirely, so the
    /// token and user are never rehydrated without each other. If storage
    /// cannot be read at all, this run starts signed out and the stored
    /// session is left for the next one.
    pub fn initialize(&self) {
        let (token, raw_user) = match self.read_slots() {
            Ok(slots) => slots,
            Err(e) => {
                warn!(error = %e, "Failed to read session storage, starting signed out");
                self.state.send_replace(SessionState::default());
                return;
            }
        };

        let user = match raw_user.as_deref().map(serde_json::from_str::<User>) {
            Some(Ok(user)) => Some(user),
            Some(Err(e)) => {
                warn!(error = %e, "Failed to parse stored user, discarding session");
                None
            }
            None => None,
        };

        match (token, user) {
            (Some(token), Some(user)) => {
                debug!(user_id = user.id, "Session restored");
                self.state.send_replace(SessionState {
                    token: Some(token),
                    user: Some(user),
                });
            }
            (None, None) if raw_user.is_none() => {
                debug!("No stored session");
                self.state.send_replace(SessionState::default());
            }
            _ => {
                warn!("Stored session is incomplete, clearing it");
                self.state.send_replace(SessionState::default());
                if let Err(e) = self.remove_slots() {
                    warn!(error = %e, "Failed to clear incomplete session");
                }
            }
        }
    }

    /// Replace the session with a freshly issued token and user.
    ///
    /// The in-memory state is updated first and stays authoritative even if
    /// persisting fails. A failed write clears both slots, so storage never
    /// pairs the new token with an older user.
    pub fn set_auth(&self, token: impl Into<String>, user: User) -> Result<(), StorageError> {
        let token = token.into();
        let user_json = serde_json::to_string(&user)?;
        info!(user_id = user.id, login = %user.github_login, "Session established");

        self.state.send_replace(SessionState {
            token: Some(token.clone()),
            user: Some(user),
        });

        let written = self
            .storage
            .set(&Self::token_key(), &token)
            .and_then(|_| self.storage.set(&Self::user_key(), &user_json));
        if let Err(e) = written {
            if let Err(clear) = self.remove_slots() {
                warn!(error = %clear, "Failed to clear partially written session");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Drop the session from memory and storage. Safe to call repeatedly.
    pub fn logout(&self) -> Result<(), StorageError> {
        let was_authenticated = self.is_authenticated();
        self.state.send_if_modified(|state| {
            if *state == SessionState::default() {
                false
            } else {
                *state = SessionState::default();
                true
            }
        });
        if was_authenticated {
            info!("Session cleared");
        }
        self.remove_slots()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Current bearer token, read at call time
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receive every session change as it happens
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn read_slots(&self) -> Result<(Option<String>, Option<String>), StorageError> {
        let token = self.storage.get(&Self::token_key())?;
        let user = self.storage.get(&Self::user_key())?;
        Ok((token, user))
    }

    fn remove_slots(&self) -> Result<(), StorageError> {
        let token_result = self.storage.remove(&Self::token_key());
        let user_result = self.storage.remove(&Self::user_key());
        token_result.and(user_result)
    }
}
