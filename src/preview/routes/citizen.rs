//! GET / renders the citizen lookup page.
//!
//! `?search=<q>` filters the grid; `?lat=<f>&lon=<f>` runs location
//! detection and opens the chat with the greeting.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::pages::CitizenPage;
use crate::preview::state::PreviewState;

#[derive(Debug, Default, Deserialize)]
pub struct CitizenParams {
    pub search: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

pub async fn citizen(
    State(state): State<Arc<PreviewState>>,
    Query(params): Query<CitizenParams>,
) -> Html<String> {
    let mut page = CitizenPage::new(&state.context);

    // A failed search was already logged; the grid stays empty.
    let filtered = match params.search.as_deref() {
        Some(query) => page.search(query).await.unwrap_or(true),
        None => false,
    };
    if !filtered {
        page.load().await.ok();
    }

    if let (Some(lat), Some(lon)) = (params.lat, params.lon) {
        page.detect_location(lat, lon).await;
    }

    Html(page.to_html())
}
