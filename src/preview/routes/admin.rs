//! GET /admin renders the analytics dashboard.
//!
//! The browser's Basic credentials are forwarded to the API through a
//! per-request store, so nothing is remembered between requests. Without
//! valid credentials the login section is rendered with a 401 challenge.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::auth::AuthState;
use crate::pages::{AdminDashboard, PageContext};
use crate::preview::error::{PreviewError, PreviewResult};
use crate::preview::state::PreviewState;
use crate::session::{KeyValueStore, MemoryStore, ADMIN_CREDENTIALS_KEY};

const CHALLENGE: &str = r#"Basic realm="civitas-admin""#;

pub async fn admin(
    State(state): State<Arc<PreviewState>>,
    headers: HeaderMap,
) -> PreviewResult<Response> {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    if let Some(token) = basic_token(&headers)? {
        store.set(ADMIN_CREDENTIALS_KEY, token)?;
    }

    let ctx = PageContext {
        store,
        ..state.context.clone()
    };
    let mut dashboard = AdminDashboard::new(&ctx);
    let auth = dashboard.start().await;
    let html = Html(dashboard.to_html());

    if auth == AuthState::Authenticated {
        return Ok(html.into_response());
    }

    Ok((
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, CHALLENGE)],
        html,
    )
        .into_response())
}

/// The base64 token of a `Basic` authorization header
fn basic_token(headers: &HeaderMap) -> PreviewResult<Option<&str>> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| PreviewError::BadRequest("unreadable Authorization header".to_string()))?;

    match value.strip_prefix("Basic ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim())),
        Some(_) => Ok(None),
        None => Err(PreviewError::BadRequest(
            "unsupported authorization scheme".to_string(),
        )),
    }
}
