//! Edit-event form: details and image

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::api::{ApiClient, ApiError, ErrorKind, ImageUpload, GENERIC_MESSAGE};
use crate::form::{EditForm, Validation};
use crate::models::Event;
use crate::session::{Flash, RequestContext, SessionToken};
use crate::state::AppState;
use crate::views::{self, EditView, Notice};

use super::site_path;

const TITLE: &str = "Edit Event";

pub struct EditProps {
    pub event: Event,
    pub token: Option<SessionToken>,
}

/// Fetch the event being edited. The fetch itself is unauthenticated.
pub async fn load(api: &ApiClient, id: &str, ctx: &RequestContext) -> Result<EditProps, ApiError> {
    let event = api.event(id).await?;
    Ok(EditProps {
        event,
        token: ctx.token.clone(),
    })
}

#[derive(Debug, Deserialize, Default)]
pub struct EditQuery {
    /// `image` opens the upload modal
    pub modal: Option<String>,
}

/// What the browser sees after an update attempt
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Go to the updated event and show `flash` there
    Navigate { location: String, flash: Flash },
    Stay {
        notices: Vec<Notice>,
        status: StatusCode,
    },
}

/// Map the update result, keeping any empty-field warning from `validation`
/// on either path
pub fn submit_outcome(result: Result<Event, ApiError>, validation: &Validation) -> SubmitOutcome {
    let warning = validation.notice().map(Notice::warning);

    match result {
        Ok(updated) => {
            let location = if updated.slug.is_empty() {
                "/events".to_string()
            } else {
                site_path(&["events", &updated.slug])
            };
            let flash = if warning.is_some() {
                Flash::UpdatedWithEmptyFields
            } else {
                Flash::EventUpdated
            };
            SubmitOutcome::Navigate { location, flash }
        }
        Err(err) => {
            let (message, status) = match err.kind() {
                ErrorKind::Unauthorized => (err.user_message(), StatusCode::FORBIDDEN),
                ErrorKind::Rejected | ErrorKind::Unavailable => {
                    (GENERIC_MESSAGE.to_string(), StatusCode::BAD_GATEWAY)
                }
            };
            let mut notices: Vec<Notice> = warning.into_iter().collect();
            notices.push(Notice::error(message));
            SubmitOutcome::Stay { notices, status }
        }
    }
}

/// Same mapping for the image upload, which keeps the backend's message
pub fn upload_failure(err: &ApiError) -> (Notice, StatusCode) {
    let status = match err.kind() {
        ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
        ErrorKind::Rejected | ErrorKind::Unavailable => StatusCode::BAD_GATEWAY,
    };
    (Notice::error(err.user_message()), status)
}

fn render_form(id: &str, form: &EditForm, notices: Vec<Notice>, status: StatusCode) -> Response {
    let view = EditView {
        title: TITLE,
        notices,
        event_id: id,
        form,
    };
    views::render(status, &view)
}

/// GET /events/edit/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<EditQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = RequestContext::from_headers(&headers);
    let props = match load(&state.api, &id, &ctx).await {
        Ok(props) => props,
        Err(err) => return views::load_failed(TITLE, &err),
    };

    let mut form = EditForm::from_event(&props.event);
    form.show_modal = query.modal.as_deref() == Some("image");
    render_form(&id, &form, Vec::new(), StatusCode::OK)
}

/// POST /events/edit/:id
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let ctx = RequestContext::from_headers(&headers);
    let props = match load(&state.api, &id, &ctx).await {
        Ok(props) => props,
        Err(err) => return views::load_failed(TITLE, &err),
    };

    let mut form = EditForm::from_event(&props.event);
    form.apply(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    let validation = form.validate(state.empty_fields);
    match &validation {
        Validation::Blocked(empty) => {
            tracing::info!("Update of event {} blocked, empty fields: {:?}", id, empty);
            let notices = validation.notice().map(Notice::warning).into_iter().collect();
            return render_form(&id, &form, notices, StatusCode::UNPROCESSABLE_ENTITY);
        }
        Validation::Warned(empty) => {
            tracing::info!("Updating event {} with empty fields: {:?}", id, empty);
        }
        Validation::Valid => {}
    }

    let result = state
        .api
        .update_event(&id, &form.values, props.token.as_ref())
        .await;

    match submit_outcome(result, &validation) {
        SubmitOutcome::Navigate { location, flash } => {
            tracing::info!("Updated event {} -> {}", id, location);
            (
                [(header::SET_COOKIE, flash.set_cookie(state.secure_cookies))],
                Redirect::to(&location),
            )
                .into_response()
        }
        SubmitOutcome::Stay { notices, status } => render_form(&id, &form, notices, status),
    }
}

/// Pull the `file` part out of the upload form
async fn read_upload(multipart: &mut Multipart) -> Result<Option<ImageUpload>, String> {
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("image").to_string();
        let content_type = field.content_type().map(String::from);
        let data = field.bytes().await.map_err(|e| e.to_string())?;
        if data.is_empty() {
            return Ok(None);
        }
        return Ok(Some(ImageUpload {
            file_name,
            content_type,
            data,
        }));
    }
    Ok(None)
}

/// POST /events/edit/:id/image
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let ctx = RequestContext::from_headers(&headers);

    let failure = match read_upload(&mut multipart).await {
        Ok(Some(upload)) => match state.api.upload_event_image(&id, upload, ctx.token()).await {
            Ok(()) => match state.api.event(&id).await {
                Ok(updated) => {
                    tracing::info!(
                        "Image uploaded for event {} (preview: {})",
                        id,
                        updated.thumbnail_url().unwrap_or("none")
                    );
                    return Redirect::to(&site_path(&["events", "edit", &id])).into_response();
                }
                Err(err) => upload_failure(&err),
            },
            Err(err) => upload_failure(&err),
        },
        Ok(None) => (
            Notice::warning("Please choose an image to upload"),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        Err(e) => {
            tracing::warn!("Unreadable upload for event {}: {}", id, e);
            (Notice::error(GENERIC_MESSAGE), StatusCode::BAD_REQUEST)
        }
    };

    let (notice, status) = failure;
    match load(&state.api, &id, &ctx).await {
        Ok(props) => {
            let mut form = EditForm::from_event(&props.event);
            form.show_modal = true;
            render_form(&id, &form, vec![notice], status)
        }
        Err(err) => views::load_failed(TITLE, &err),
    }
}
