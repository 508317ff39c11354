//! Client error types

use thiserror::Error;

/// Errors returned by the remote data client
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response (DNS, connection reset, timeout)
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered 401
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-2xx answer
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// The body did not match the expected contract
    #[error("Parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid request built by the caller
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Whether the failure should force the admin gate back to logged out
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Transport("request timed out".to_string())
        } else if e.is_connect() {
            ClientError::Transport(format!("connection failed: {}", e))
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
