//! Remote Data Client
//!
//! One-shot JSON calls against the civic API. Every call goes through a
//! [`Transport`], so the page controllers can be driven by a real HTTP
//! connection or by an in-memory script.
//!
//! # Endpoints
//!
//! - `GET /api/representatives?search=<q>`
//! - `POST /api/detect-location`
//! - `POST /api/chat`
//! - `POST /api/feedback`
//! - `POST /api/analytics/heartbeat`
//! - `POST /api/analytics/event`
//! - `GET /api/admin/stats` (Basic auth)
//! - `POST /api/admin/login` (Basic auth)
//!
//! Nothing here retries. Callers decide what a failure means for the page.

pub mod dto;
mod error;
#[cfg(test)]
pub(crate) mod mock;
mod transport;

pub use dto::*;
pub use error::{ClientError, ClientResult};
pub use transport::HttpTransport;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// HTTP method of an [`ApiRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// A request to one of the API endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Full `Authorization` header value
    pub authorization: Option<String>,
}

impl ApiRequest {
    pub fn get(path: &str) -> Self {
        Self {
            method: Method::Get,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
            authorization: None,
        }
    }

    pub fn post(path: &str) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(path)
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_json<T: Serialize>(mut self, body: &T) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach a base64 `user:pass` token as Basic credentials
    pub fn with_basic_token(mut self, token: &str) -> Self {
        self.authorization = Some(format!("Basic {}", token));
        self
    }
}

/// Raw answer of a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single request. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> ClientResult<ApiResponse>;
}

/// Typed client for the civic API
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client talking HTTP to the configured server
    pub fn http(config: &crate::config::ApiConfig) -> ClientResult<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Fetch representatives, optionally filtered by a search term
    pub async fn representatives(&self, search: Option<&str>) -> ClientResult<Vec<Representative>> {
        let mut request = ApiRequest::get("/api/representatives");
        if let Some(q) = search.filter(|q| !q.is_empty()) {
            request = request.with_query("search", q);
        }

        let response = self.send(request).await?;
        Ok(decode_representatives(&response.body)?)
    }

    /// Resolve coordinates to a location and its representatives
    pub async fn detect_location(&self, latitude: f64, longitude: f64) -> ClientResult<LocationReply> {
        let request = ApiRequest::post("/api/detect-location")
            .with_json(&LocationRequest { latitude, longitude })?;
        self.send_json(request).await
    }

    /// Ask the assistant a question
    pub async fn chat(&self, query: &str) -> ClientResult<ChatReply> {
        let request = ApiRequest::post("/api/chat").with_json(&ChatRequest {
            query: query.to_string(),
        })?;
        self.send_json(request).await
    }

    /// Rate a stored chat answer. The response body is not used.
    pub async fn feedback(&self, chat_id: i64, rating: u8) -> ClientResult<()> {
        let request =
            ApiRequest::post("/api/feedback").with_json(&FeedbackRequest { chat_id, rating })?;
        self.send(request).await.map(|_| ())
    }

    pub async fn heartbeat(&self, session_id: &str) -> ClientResult<()> {
        let request = ApiRequest::post("/api/analytics/heartbeat").with_json(&HeartbeatRequest {
            session_id: session_id.to_string(),
        })?;
        self.send(request).await.map(|_| ())
    }

    pub async fn event(&self, session_id: &str, event_type: &str, details: &str) -> ClientResult<()> {
        let request = ApiRequest::post("/api/analytics/event").with_json(&EventRequest {
            session_id: session_id.to_string(),
            event_type: event_type.to_string(),
            details: details.to_string(),
        })?;
        self.send(request).await.map(|_| ())
    }

    /// Validate admin credentials
    pub async fn admin_login(&self, token: &str) -> ClientResult<()> {
        let request = ApiRequest::post("/api/admin/login").with_basic_token(token);
        self.send(request).await.map(|_| ())
    }

    /// Fetch the analytics snapshot
    pub async fn admin_stats(&self, token: &str) -> ClientResult<StatsSnapshot> {
        let request = ApiRequest::get("/api/admin/stats").with_basic_token(token);
        self.send_json(request).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let response = self.send(request).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Execute a request and map non-2xx statuses to errors
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let path = request.path.clone();
        let response = self.transport.execute(request).await?;

        if response.is_success() {
            return Ok(response);
        }

        tracing::debug!(path = %path, status = response.status, "API call rejected");

        if response.status == 401 {
            return Err(ClientError::Unauthorized);
        }

        Err(ClientError::Status {
            status: response.status,
            message: response.body,
        })
    }
}
