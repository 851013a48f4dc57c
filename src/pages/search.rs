//! Search results page

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::api::{ApiClient, ApiError};
use crate::models::Event;
use crate::state::AppState;
use crate::views::{self, SearchView};

const TITLE: &str = "Search results";

/// Query parameters for /events/search
#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    /// Free text; missing means empty
    #[serde(default)]
    pub term: String,
}

/// Events whose name, performers, description or venue contain `term`
pub async fn load(api: &ApiClient, term: &str) -> Result<Vec<Event>, ApiError> {
    api.search_events(term).await
}

/// GET /events/search?term=...
pub async fn show(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    let events = match load(&state.api, &query.term).await {
        Ok(events) => events,
        Err(err) => return views::load_failed(TITLE, &err),
    };
    tracing::debug!("Search '{}' matched {} event(s)", query.term, events.len());

    let view = SearchView {
        title: TITLE,
        notices: Vec::new(),
        term: &query.term,
        events: &events,
    };
    views::render(StatusCode::OK, &view)
}
