//! Session state shared by the gateway, the route guard and the views

use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::types::AuthData;
use crate::storage::KeyValueStore;

/// Default storage key of the cached user
pub const USER_KEY: &str = "session-user";

/// Default storage key of the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh-token";

/// Point-in-time copy of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// The cached user profile
    pub user: Option<AuthData>,

    /// Whether the server confirmed the session since startup
    pub login_verified: bool,

    /// The access token, never persisted
    pub access_token: Option<String>,

    /// The refresh token, persisted
    pub refresh_token: Option<String>,

    /// Derived from `user.expiry_date`
    pub expiry_date: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    /// Check if the session has expired at `now`. Unknown expiry never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry_date {
            Some(expiry) => now >= expiry,
            None => false,
        }
    }
}

/// The session context.
///
/// Readable by anyone holding it. Only the auth gateway writes to it.
pub struct SessionStore {
    state: RwLock<SessionSnapshot>,
    storage: Arc<dyn KeyValueStore>,
    user_key: String,
    refresh_token_key: String,
}

impl SessionStore {
    /// Create a session context over `storage` with the default keys
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_keys(storage, USER_KEY, REFRESH_TOKEN_KEY)
    }

    /// Create a session context, restoring the persisted fields.
    ///
    /// `login_verified` always starts out false.
    pub fn with_keys(storage: Arc<dyn KeyValueStore>, user_key: &str, refresh_token_key: &str) -> Self {
        let user = match storage.get(user_key) {
            Ok(Some(raw)) => match serde_json::from_str::<AuthData>(&raw) {
                Ok(user) if !user.username.is_empty() => Some(user),
                Ok(_) => None,
                Err(err) => {
                    log::warn!("discarding unreadable cached user: {}", err);
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                log::warn!("failed to read cached user: {}", err);
                None
            }
        };

        let refresh_token = storage
            .get(refresh_token_key)
            .unwrap_or_else(|err| {
                log::warn!("failed to read refresh token: {}", err);
                None
            })
            .filter(|token| !token.is_empty());

        let expiry_date = user.as_ref().and_then(AuthData::expiry);
        log::debug!(
            "session restored (user: {})",
            user.as_ref().map(|u| u.username.as_str()).unwrap_or("-")
        );

        Self {
            state: RwLock::new(SessionSnapshot {
                user,
                login_verified: false,
                access_token: None,
                refresh_token,
                expiry_date,
            }),
            storage,
            user_key: user_key.to_string(),
            refresh_token_key: refresh_token_key.to_string(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionSnapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn user(&self) -> Option<AuthData> {
        self.read().user.clone()
    }

    pub fn login_verified(&self) -> bool {
        self.read().login_verified
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    pub fn expiry_date(&self) -> Option<DateTime<Utc>> {
        self.read().expiry_date
    }

    /// All fields read under one lock
    pub fn snapshot(&self) -> SessionSnapshot {
        self.read().clone()
    }

    /// Clear every field in one step
    pub fn reset(&self) {
        let mut state = self.write();
        *state = SessionSnapshot::default();
        self.forget(&self.user_key);
        self.forget(&self.refresh_token_key);
        log::debug!("session reset");
    }

    /// Mark the session verified for `user`, storing any tokens handed out with it.
    ///
    /// Refused for a user without username. A `None` token keeps the current value.
    pub(crate) fn establish(
        &self,
        user: AuthData,
        access_token: Option<String>,
        refresh_token: Option<String>,
    ) -> bool {
        if user.username.is_empty() {
            log::warn!("refusing to verify a session without username");
            return false;
        }

        let mut state = self.write();
        self.persist_user(&user);
        state.expiry_date = user.expiry();
        state.user = Some(user);
        if access_token.is_some() {
            state.access_token = access_token;
        }
        if let Some(token) = refresh_token {
            if let Err(err) = self.storage.set(&self.refresh_token_key, &token) {
                log::warn!("failed to persist refresh token: {}", err);
            }
            state.refresh_token = Some(token);
        }
        state.login_verified = true;
        true
    }

    /// Replace the cached user wholesale, keeping the verified flag
    pub(crate) fn replace_user(&self, user: AuthData) {
        let mut state = self.write();
        self.persist_user(&user);
        state.expiry_date = user.expiry();
        state.user = Some(user);
    }

    fn persist_user(&self, user: &AuthData) {
        let result = serde_json::to_string(user)
            .map_err(crate::error::Error::from)
            .and_then(|json| self.storage.set(&self.user_key, &json));
        if let Err(err) = result {
            log::warn!("failed to persist user: {}", err);
        }
    }

    fn forget(&self, key: &str) {
        if let Err(err) = self.storage.remove(key) {
            log::warn!("failed to remove {}: {}", key, err);
        }
    }
}
