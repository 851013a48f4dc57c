//! HTML views
//!
//! Each page is an askama template struct under `templates/`. Every view
//! carries a `title` and its `notices` because the shared layout renders
//! both; notices show in order, one box each.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::api::ApiError;
use crate::api::ErrorKind;
use crate::form::EditForm;
use crate::models::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Inline message shown above the page content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self.level {
            NoticeLevel::Success => "notice notice-success",
            NoticeLevel::Warning => "notice notice-warning",
            NoticeLevel::Error => "notice notice-error",
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardView<'a> {
    pub title: &'a str,
    pub notices: Vec<Notice>,
    pub events: &'a [Event],
}

#[derive(Template)]
#[template(path = "confirm_delete.html")]
pub struct ConfirmDeleteView<'a> {
    pub title: &'a str,
    pub notices: Vec<Notice>,
    pub event_id: &'a str,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditView<'a> {
    pub title: &'a str,
    pub notices: Vec<Notice>,
    /// Id as it appears in the route, used for form actions
    pub event_id: &'a str,
    pub form: &'a EditForm,
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchView<'a> {
    pub title: &'a str,
    pub notices: Vec<Notice>,
    pub term: &'a str,
    pub events: &'a [Event],
}

#[derive(Template)]
#[template(path = "events.html")]
pub struct EventsView<'a> {
    pub title: &'a str,
    pub notices: Vec<Notice>,
    pub events: &'a [Event],
}

#[derive(Template)]
#[template(path = "event.html")]
pub struct EventView<'a> {
    pub title: &'a str,
    pub notices: Vec<Notice>,
    pub event: &'a Event,
}

/// Fallback page for anything a loader couldn't produce
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorView<'a> {
    pub title: &'a str,
    pub notices: Vec<Notice>,
    pub heading: &'a str,
    pub message: String,
}

/// Render `view` with `status`, degrading to a plain 500 if the template fails
pub fn render<T: Template>(status: StatusCode, view: &T) -> Response {
    match view.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template render failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error rendering page").into_response()
        }
    }
}

/// Status code a page answers with when its loader failed
pub fn error_status(err: &ApiError) -> StatusCode {
    match err.kind() {
        ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
        ErrorKind::Rejected => match err {
            ApiError::Rejected { status, .. } if *status == StatusCode::NOT_FOUND => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::BAD_GATEWAY,
        },
        ErrorKind::Unavailable => StatusCode::BAD_GATEWAY,
    }
}

/// The fallback view for a failed load
pub fn load_failed(title: &str, err: &ApiError) -> Response {
    tracing::warn!("Loading '{}' failed: {}", title, err);

    let heading = match err.kind() {
        ErrorKind::Unauthorized => "Not allowed",
        ErrorKind::Rejected => "Could not load this page",
        ErrorKind::Unavailable => "Events service unavailable",
    };
    let message = match err.kind() {
        ErrorKind::Unauthorized => {
            format!("{} Please log in with the account that owns it.", err.user_message())
        }
        _ => err.user_message(),
    };

    let view = ErrorView {
        title,
        notices: Vec::new(),
        heading,
        message,
    };
    render(error_status(err), &view)
}

/// Fallback for an action whose page can't be reloaded: keep the action's
/// own message rather than the reload's
pub fn action_failed(title: &str, notice: Notice, status: StatusCode) -> Response {
    let view = ErrorView {
        title,
        notices: Vec::new(),
        heading: "Something went wrong",
        message: notice.message,
    };
    render(status, &view)
}

/// Plain "not found" page for routes whose record doesn't exist
pub fn not_found(what: &str) -> Response {
    let view = ErrorView {
        title: "Not found",
        notices: Vec::new(),
        heading: "Not found",
        message: format!("No {} matches this address.", what),
    };
    render(StatusCode::NOT_FOUND, &view)
}
