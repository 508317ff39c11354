//! GET /parties renders the election results viewer

use axum::{extract::Query, extract::State, response::Html};
use serde::Deserialize;
use std::sync::Arc;

use crate::pages::PartiesPage;
use crate::preview::state::PreviewState;

#[derive(Debug, Default, Deserialize)]
pub struct PartiesParams {
    /// Expand the party grid
    #[serde(default)]
    pub all: bool,
    /// ISO code of a state whose breakdown opens in the modal
    pub state: Option<String>,
    #[serde(default)]
    pub criteria: bool,
}

pub async fn parties(
    State(state): State<Arc<PreviewState>>,
    Query(params): Query<PartiesParams>,
) -> Html<String> {
    let mut page = PartiesPage::new(&state.context.flags);

    if params.all {
        page.toggle_parties();
    }
    if let Some(code) = params.state.as_deref().filter(|c| !c.is_empty()) {
        page.open_state(code);
    }
    if params.criteria {
        page.open_criteria();
    }

    Html(page.to_html())
}
