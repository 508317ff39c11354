//! Auth Gate
//!
//! Holds the admin's Basic credential token in the key-value store. The
//! gate is authenticated exactly when a token is stored; any 401 from a
//! protected call removes it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use thiserror::Error;

use crate::client::{ApiClient, ClientError, StatsSnapshot};
use crate::session::{KeyValueStore, StoreError, ADMIN_CREDENTIALS_KEY};

/// Message shown under the login form after a rejected login
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// base64 of `user:pass`
pub fn encode_credentials(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{}:{}", username, password))
}

pub struct AuthGate {
    client: ApiClient,
    store: Arc<dyn KeyValueStore>,
    last_error: Option<String>,
}

impl AuthGate {
    pub fn new(client: ApiClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            client,
            store,
            last_error: None,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store
            .get(ADMIN_CREDENTIALS_KEY)
            .filter(|t| !t.is_empty())
    }

    pub fn state(&self) -> AuthState {
        if self.token().is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthState::Authenticated
    }

    /// Resume a stored session without asking the server
    pub fn restore(&self) -> AuthState {
        let state = self.state();
        if state == AuthState::Authenticated {
            tracing::info!("Restored admin session");
        }
        state
    }

    /// Message from the last rejected login, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Check credentials with the server and store them on success
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        let token = encode_credentials(username, password);

        match self.client.admin_login(&token).await {
            Ok(()) => {
                self.store.set(ADMIN_CREDENTIALS_KEY, &token)?;
                self.last_error = None;
                tracing::info!("Admin logged in");
                Ok(())
            }
            Err(ClientError::Unauthorized) | Err(ClientError::Status { .. }) => {
                self.last_error = Some(INVALID_CREDENTIALS.to_string());
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                tracing::warn!("Login request failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Forget the stored token
    pub fn logout(&mut self) {
        if let Err(e) = self.store.remove(ADMIN_CREDENTIALS_KEY) {
            tracing::warn!("Failed to clear admin credentials: {}", e);
        }
        tracing::info!("Admin logged out");
    }

    /// Fetch the analytics snapshot with the stored token.
    ///
    /// A missing token or a 401 logs the admin out.
    pub async fn fetch_stats(&mut self) -> Result<StatsSnapshot, AuthError> {
        let Some(token) = self.token() else {
            self.logout();
            return Err(AuthError::NotAuthenticated);
        };

        match self.client.admin_stats(&token).await {
            Ok(stats) => Ok(stats),
            Err(e) if e.is_auth_failure() => {
                self.logout();
                Err(AuthError::NotAuthenticated)
            }
            Err(e) => Err(e.into()),
        }
    }
}
