//! Explicit session state for the API client
//!
//! The session is an explicitly passed object with a scoped lifecycle:
//! created empty, populated at login, cleared at logout or as soon as the
//! client observes an authentication failure. Nothing is kept in ambient
//! storage.

use std::sync::Arc;

use async_trait::async_trait;
use fleetwatch_domain::{Role, SessionUser};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::client::ApiClient;
use super::errors::ApiError;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get the current access token, if any.
    ///
    /// `None` means the request goes out unauthenticated.
    async fn access_token(&self) -> Result<Option<String>, ApiError>;

    /// Drop any held credentials. Called by the client when the backend
    /// rejects the credential (401).
    fn invalidate(&self) {}
}

#[derive(Debug, Clone)]
struct Credentials {
    token: String,
    user: SessionUser,
}

/// In-memory session credential cell.
#[derive(Default)]
pub struct Session {
    inner: RwLock<Option<Credentials>>,
}

impl Session {
    /// Create a fresh, unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install credentials after a successful login.
    pub fn establish(&self, token: String, user: SessionUser) {
        *self.inner.write() = Some(Credentials { token, user });
    }

    /// Clear all credentials.
    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_some()
    }

    /// Identity of the logged-in user, if any.
    pub fn current_user(&self) -> Option<SessionUser> {
        self.inner.read().as_ref().map(|creds| creds.user.clone())
    }
}

#[async_trait]
impl AccessTokenProvider for Session {
    async fn access_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.inner.read().as_ref().map(|creds| creds.token.clone()))
    }

    fn invalidate(&self) {
        debug!("session invalidated after authentication failure");
        self.clear();
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    user: Option<SessionUser>,
    #[serde(default)]
    role: Option<Role>,
}

/// Session lifecycle operations against the backend auth endpoint.
pub struct SessionService {
    client: Arc<ApiClient>,
    session: Arc<Session>,
}

impl SessionService {
    pub fn new(client: Arc<ApiClient>, session: Arc<Session>) -> Self {
        Self { client, session }
    }

    /// Log in and establish the session.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for empty credentials (no network call), `Auth`
    /// if the backend rejects them, or the transport error otherwise.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ApiError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::Validation("email is required".to_string()));
        }
        if password.is_empty() {
            return Err(ApiError::Validation("password is required".to_string()));
        }

        let body = serde_json::to_value(LoginRequest { email, password })
            .map_err(|e| ApiError::Validation(format!("failed to encode login request: {e}")))?;

        let raw = self.client.send(reqwest::Method::POST, "/auth/login", &[], Some(&body)).await?;

        let response: LoginResponse = serde_json::from_value(raw)
            .map_err(|e| ApiError::Backend(format!("malformed login response: {e}")))?;

        // Older backend builds omit the user object from the envelope.
        let user = response.user.unwrap_or_else(|| SessionUser {
            id: None,
            email: email.to_string(),
            role: response.role.unwrap_or(Role::Admin),
        });

        self.session.establish(response.token, user.clone());
        info!(role = ?user.role, "session established");
        Ok(user)
    }

    /// End the session, dropping all credentials.
    pub fn logout(&self) {
        self.session.clear();
        info!("session ended");
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.session.current_user()
    }
}
