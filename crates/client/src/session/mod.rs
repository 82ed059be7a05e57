//! Session store: the single source of truth for who is logged in.
//!
//! # Design
//!
//! [`SessionStore`] is a cheaply cloneable handle. The record lives in a
//! `tokio::sync::watch` channel, so every clone sees a mutation as soon as it
//! returns and any number of observers can [`subscribe`](SessionStore::subscribe)
//! for change notifications. The record is only ever changed through the four
//! mutators (`login`, `logout`, `set_token`, `set_user`); each one persists the
//! whole record afterwards.
//!
//! Persistence is best effort: a failed write is logged and the in-memory
//! session stays authoritative. No expiry check happens at load time; the API
//! client checks expiry lazily before each request.

mod storage;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use catalogue_core::User;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};

use crate::token::AccessToken;

/// Storage key the session record is persisted under.
pub const SESSION_STORAGE_KEY: &str = "auth-storage";

/// Session-scoped key remembering the email typed into the login form.
pub const REMEMBERED_EMAIL_KEY: &str = "user_email";

/// The client-held record of the current identity and bearer token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    pub access_token: Option<AccessToken>,
    pub is_authenticated: bool,
}

impl Session {
    /// Whether the signed-in user may use the admin console.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.user.as_ref().is_some_and(User::is_admin)
    }
}

/// Handle to the shared session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    state: watch::Sender<Session>,
    storage: Arc<dyn SessionStorage>,
    /// Values that live only as long as this process's session.
    scratch: Mutex<HashMap<String, String>>,
}

impl SessionStore {
    /// Open the store, rehydrating any session persisted in `storage`.
    ///
    /// An unreadable or corrupt record is logged and replaced by an empty
    /// session.
    #[must_use]
    pub fn open(storage: Arc<dyn SessionStorage>) -> Self {
        let initial = match storage.load(SESSION_STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Session>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable persisted session");
                Session::default()
            }),
            Ok(None) => Session::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load persisted session");
                Session::default()
            }
        };

        if initial.is_authenticated {
            tracing::debug!("Rehydrated authenticated session");
        }

        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(SessionStoreInner {
                state,
                storage,
                scratch: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// A store backed by memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStorage::new()))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Snapshot of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<AccessToken> {
        self.inner.state.borrow().access_token.clone()
    }

    /// Current user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated
    }

    /// Receive a notification on every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Sign in: set identity and token together.
    pub fn login(&self, user: User, token: AccessToken) {
        tracing::info!(user_id = %user.id, "Session started");
        self.inner.state.send_replace(Session {
            user: Some(user),
            access_token: Some(token),
            is_authenticated: true,
        });
        self.persist();
    }

    /// Sign out: clear identity, token and session-scoped cached credentials.
    ///
    /// Does not navigate; callers redirect as they see fit.
    pub fn logout(&self) {
        self.scratch().remove(REMEMBERED_EMAIL_KEY);
        let previous = self.inner.state.send_replace(Session::default());
        if previous.is_authenticated || previous.access_token.is_some() {
            tracing::info!("Session cleared");
        }
        self.persist();
    }

    /// Replace only the token, e.g. after a silent refresh.
    pub fn set_token(&self, token: AccessToken) {
        self.inner.state.send_modify(|session| {
            session.access_token = Some(token);
        });
        self.persist();
    }

    /// Replace only the identity; `is_authenticated` follows `user.is_some()`.
    pub fn set_user(&self, user: Option<User>) {
        self.inner.state.send_modify(|session| {
            session.is_authenticated = user.is_some();
            session.user = user;
        });
        self.persist();
    }

    // =========================================================================
    // Session-scoped scratch values
    // =========================================================================

    /// Remember a value for the rest of this session. Never persisted.
    pub fn remember(&self, key: &str, value: impl Into<String>) {
        self.scratch().insert(key.to_string(), value.into());
    }

    /// Read a value stored with [`remember`](Self::remember).
    #[must_use]
    pub fn recall(&self, key: &str) -> Option<String> {
        self.scratch().get(key).cloned()
    }

    fn scratch(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.inner
            .scratch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self) {
        let session = self.snapshot();
        let result = if session == Session::default() {
            self.inner.storage.remove(SESSION_STORAGE_KEY)
        } else {
            serde_json::to_string(&session)
                .map_err(StorageError::from)
                .and_then(|raw| self.inner.storage.save(SESSION_STORAGE_KEY, &raw))
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist session");
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}
