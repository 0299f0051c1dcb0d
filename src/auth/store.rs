//! Auth store: Anonymous / Authenticated state backed by two storage keys.
//!
//! Keys:
//! - `portphelia_user`: JSON user record
//! - `portphelia_authenticated`: literal `"true"` while signed in

use crate::clock::{iso_millis, Clock, IdGenerator};
use crate::error::{AuthError, StorageError};
use crate::navigation::{Access, Page};
use crate::storage::{KeyValueStorage, AUTHENTICATED_KEY, USER_KEY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis::option")]
    pub login_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis::option")]
    pub registration_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct AuthStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    ids: IdGenerator,
    min_password_length: usize,
    user: Option<User>,
    is_authenticated: bool,
    auth_error: String,
}

impl AuthStore {
    /// Build the store and restore any persisted session.
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        let mut store = Self {
            storage,
            clock,
            ids: IdGenerator::new(),
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            user: None,
            is_authenticated: false,
            auth_error: String::new(),
        };
        store.initialize_auth();
        store
    }

    pub fn with_min_password_length(mut self, len: usize) -> Self {
        self.min_password_length = len;
        self
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<u64> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn user_name(&self) -> &str {
        self.user.as_ref().map(|u| u.username.as_str()).unwrap_or("")
    }

    pub fn user_email(&self) -> &str {
        self.user.as_ref().map(|u| u.email.as_str()).unwrap_or("")
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn auth_error(&self) -> &str {
        &self.auth_error
    }

    pub fn clear_error(&mut self) {
        self.auth_error.clear();
    }

    fn fail<T>(&mut self, err: AuthError) -> Result<T, AuthError> {
        match std::error::Error::source(&err) {
            Some(cause) => tracing::error!(error = %err, cause = %cause, "auth action failed"),
            None => tracing::warn!(error = %err, "auth action failed"),
        }
        self.auth_error = err.to_string();
        Err(err)
    }

    fn password_ok(&self, password: &str) -> bool {
        password.chars().count() >= self.min_password_length
    }

    fn persist(&self, user: &User) -> Result<(), StorageError> {
        let json = serde_json::to_string(user).map_err(StorageError::Encode)?;
        // Drop any earlier session flag so a half-written session never restores.
        self.storage.remove(AUTHENTICATED_KEY)?;
        self.storage.set(USER_KEY, &json)?;
        self.storage.set(AUTHENTICATED_KEY, "true")
    }

    fn commit(&mut self, user: User) {
        tracing::info!(user_id = user.id, username = %user.username, "signed in");
        self.user = Some(user);
        self.is_authenticated = true;
    }

    /// Sign in. Only checks that a username is present and the password is
    /// long enough; on success the caller should go to the returned page.
    pub fn login(&mut self, credentials: &LoginCredentials) -> Result<Page, AuthError> {
        self.auth_error.clear();

        let username = credentials.username.trim();
        if username.is_empty() || !self.password_ok(&credentials.password) {
            return self.fail(AuthError::InvalidCredentials);
        }

        let now = self.clock.now();
        let email = credentials
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}@example.com", username));
        let user = User {
            id: self.ids.next_id(now),
            username: username.to_string(),
            email,
            login_time: Some(now),
            registration_time: None,
        };

        if let Err(e) = self.persist(&user) {
            return self.fail(AuthError::LoginFailed(e));
        }
        self.commit(user);
        Ok(Page::Design)
    }

    /// Register and sign in. No uniqueness check is made.
    pub fn register(&mut self, registration: &Registration) -> Result<Page, AuthError> {
        self.auth_error.clear();

        let username = registration.username.trim();
        let email = registration.email.trim();
        if username.is_empty() || email.is_empty() || !self.password_ok(&registration.password) {
            return self.fail(AuthError::IncompleteRegistration);
        }

        let now = self.clock.now();
        let user = User {
            id: self.ids.next_id(now),
            username: username.to_string(),
            email: email.to_string(),
            login_time: None,
            registration_time: Some(now),
        };

        if let Err(e) = self.persist(&user) {
            return self.fail(AuthError::RegistrationFailed(e));
        }
        self.commit(user);
        Ok(Page::Design)
    }

    /// Sign out and forget the persisted session. Always succeeds in memory.
    pub fn logout(&mut self) -> Page {
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = user.id, "signed out");
        }
        self.is_authenticated = false;
        self.auth_error.clear();

        for key in [USER_KEY, AUTHENTICATED_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear session key");
            }
        }
        Page::Home
    }

    /// Restore a persisted session, if one is complete and readable.
    pub fn initialize_auth(&mut self) {
        let stored = self
            .storage
            .get(USER_KEY)
            .and_then(|user| Ok((user, self.storage.get(AUTHENTICATED_KEY)?)));
        let (stored_user, stored_flag) = match stored {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored session");
                return;
            }
        };

        let (Some(json), Some("true")) = (stored_user, stored_flag.as_deref()) else {
            return;
        };

        match serde_json::from_str::<User>(&json) {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "session restored");
                self.ids.observe(user.id);
                self.user = Some(user);
                self.is_authenticated = true;
            }
            Err(e) => {
                tracing::error!(error = %e, "error parsing stored user data");
                self.logout();
            }
        }
    }

    /// For sign-in style pages: send an already signed-in user onward.
    pub fn check_auth_and_redirect(&self) -> Access {
        if self.is_authenticated {
            Access::Redirect(Page::Design)
        } else {
            Access::Stay
        }
    }

    /// Route guard: anonymous users go to the sign-in page.
    pub fn require_auth(&self) -> Access {
        if self.is_authenticated {
            Access::Stay
        } else {
            Access::Redirect(Page::SignIn)
        }
    }
}
