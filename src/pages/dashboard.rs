//! User dashboard: the caller's own events, with delete

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};

use crate::api::{ApiClient, ApiError, ErrorKind};
use crate::models::Event;
use crate::session::{RequestContext, SessionToken};
use crate::state::AppState;
use crate::views::{self, ConfirmDeleteView, DashboardView, Notice};

const TITLE: &str = "User Dashboard";

/// Where a successful delete sends the browser
pub const AFTER_DELETE: &str = "/events";

pub struct DashboardProps {
    pub events: Vec<Event>,
    pub token: Option<SessionToken>,
}

/// Fetch the events owned by the session's user
pub async fn load(api: &ApiClient, ctx: &RequestContext) -> Result<DashboardProps, ApiError> {
    let events = api.my_events(ctx.token()).await?;
    Ok(DashboardProps {
        events,
        token: ctx.token.clone(),
    })
}

/// What the browser sees after a delete attempt
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Redirect(&'static str),
    Stay { notice: Notice, status: StatusCode },
}

pub fn delete_outcome(result: Result<(), ApiError>) -> DeleteOutcome {
    match result {
        Ok(()) => DeleteOutcome::Redirect(AFTER_DELETE),
        Err(err) => {
            let status = match err.kind() {
                ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
                ErrorKind::Rejected | ErrorKind::Unavailable => StatusCode::BAD_GATEWAY,
            };
            DeleteOutcome::Stay {
                notice: Notice::error(err.user_message()),
                status,
            }
        }
    }
}

async fn render_dashboard(
    state: &AppState,
    ctx: &RequestContext,
    notices: Vec<Notice>,
    status: StatusCode,
) -> Result<Response, ApiError> {
    let props = load(&state.api, ctx).await?;
    let view = DashboardView {
        title: TITLE,
        notices,
        events: &props.events,
    };
    Ok(views::render(status, &view))
}

/// GET /account/dashboard
pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = RequestContext::from_headers(&headers);
    render_dashboard(&state, &ctx, Vec::new(), StatusCode::OK)
        .await
        .unwrap_or_else(|err| views::load_failed(TITLE, &err))
}

/// GET /account/dashboard/events/:id/delete
pub async fn confirm_delete(Path(id): Path<String>) -> Response {
    let view = ConfirmDeleteView {
        title: "Delete Event",
        notices: Vec::new(),
        event_id: &id,
    };
    views::render(StatusCode::OK, &view)
}

/// POST /account/dashboard/events/:id/delete
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let ctx = RequestContext::from_headers(&headers);
    let result = state.api.delete_event(&id, ctx.token()).await;

    match delete_outcome(result) {
        DeleteOutcome::Redirect(to) => {
            tracing::info!("Deleted event {}", id);
            Redirect::to(to).into_response()
        }
        DeleteOutcome::Stay { notice, status } => {
            tracing::info!("Delete of event {} refused: {}", id, notice.message);
            match render_dashboard(&state, &ctx, vec![notice.clone()], status).await {
                Ok(page) => page,
                Err(err) => {
                    // The list is unavailable too; the refusal is what matters
                    tracing::debug!("Dashboard reload after refused delete failed: {}", err);
                    views::action_failed(TITLE, notice, status)
                }
            }
        }
    }
}
