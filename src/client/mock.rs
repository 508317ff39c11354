//! In-memory transport for tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{ApiRequest, ApiResponse, ClientError, ClientResult, Method, Transport};

enum Scripted {
    Reply(ApiResponse),
    Fail,
    Stall,
}

/// Answers requests from a per-route script and records every request.
///
/// Unscripted routes answer `200 {"status": "ok"}`.
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: &str) {
        self.routes.lock().unwrap().insert(
            (method, path.to_string()),
            Scripted::Reply(ApiResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn fail(&self, method: Method, path: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Scripted::Fail);
    }

    /// Leave requests to this route unanswered forever
    pub fn stall(&self, method: Method, path: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Scripted::Stall);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);

        let outcome = match self.routes.lock().unwrap().get(&key) {
            Some(Scripted::Reply(response)) => Some(Ok(response.clone())),
            Some(Scripted::Fail) => Some(Err(ClientError::Transport("connection refused".to_string()))),
            Some(Scripted::Stall) => None,
            None => Some(Ok(ApiResponse {
                status: 200,
                body: r#"{"status": "ok"}"#.to_string(),
            })),
        };

        match outcome {
            Some(result) => result,
            None => std::future::pending().await,
        }
    }
}
