//! Public events listing and detail pages
//!
//! These are the redirect targets of the dashboard and edit actions; the
//! detail page is where the "updated" flash is shown and consumed.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};

use crate::session::RequestContext;
use crate::state::AppState;
use crate::views::{self, EventView, EventsView};

use super::{consume_flash, flash_notices};

/// GET /events
pub async fn list(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = RequestContext::from_headers(&headers);
    let events = match state.api.list_events().await {
        Ok(events) => events,
        Err(err) => return views::load_failed("Events", &err),
    };

    let view = EventsView {
        title: "Events",
        notices: flash_notices(&ctx),
        events: &events,
    };
    consume_flash(&ctx, state.secure_cookies, views::render(StatusCode::OK, &view))
}

/// GET /events/:slug
pub async fn detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    let ctx = RequestContext::from_headers(&headers);
    let event = match state.api.event_by_slug(&slug).await {
        Ok(Some(event)) => event,
        Ok(None) => return views::not_found("event"),
        Err(err) => return views::load_failed("Event", &err),
    };

    let view = EventView {
        title: &event.name,
        notices: flash_notices(&ctx),
        event: &event,
    };
    consume_flash(&ctx, state.secure_cookies, views::render(StatusCode::OK, &view))
}
