//! Page handlers
//!
//! Each page module pairs a loader (fetch everything the page needs, or
//! fail with an `ApiError`) with the axum handlers that render it and the
//! actions that post back to it.

pub mod dashboard;
pub mod edit;
pub mod events;
pub mod search;

use axum::{
    http::header,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::VERSION;
use crate::form::EMPTY_FIELDS_MESSAGE;
use crate::session::{Flash, RequestContext};
use crate::views::Notice;

/// Bytes escaped inside one path segment: controls, space, the URL
/// delimiters, `/` and `%`
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// GET / - the events listing is the home page
pub async fn root() -> Redirect {
    Redirect::to("/events")
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": VERSION,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Site-relative path from raw segments, each one percent-encoded.
///
/// Ids and slugs come from the URL or the backend; encoding them keeps the
/// result usable as a `Location` header.
pub(crate) fn site_path(segments: &[&str]) -> String {
    segments.iter().fold(String::new(), |mut path, segment| {
        path.push('/');
        path.extend(utf8_percent_encode(segment, PATH_SEGMENT));
        path
    })
}

/// Notices for the pending flash, in display order
pub(crate) fn flash_notices(ctx: &RequestContext) -> Vec<Notice> {
    match ctx.flash {
        None => Vec::new(),
        Some(flash @ Flash::EventUpdated) => vec![Notice::success(flash.message())],
        Some(flash @ Flash::UpdatedWithEmptyFields) => vec![
            Notice::success(flash.message()),
            Notice::warning(EMPTY_FIELDS_MESSAGE),
        ],
    }
}

/// Expire the flash cookie once the page showing it has rendered
pub(crate) fn consume_flash(
    ctx: &RequestContext,
    secure: bool,
    response: impl IntoResponse,
) -> Response {
    let mut response = response.into_response();
    if ctx.flash.is_some() {
        response
            .headers_mut()
            .append(header::SET_COOKIE, Flash::clear_cookie(secure));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_site_path_encodes_segments() {
        assert_eq!(site_path(&["events", "jazz-night-live"]), "/events/jazz-night-live");
        assert_eq!(site_path(&["events", "edit", "5"]), "/events/edit/5");
        assert_eq!(site_path(&["events", "a b/c"]), "/events/a%20b%2Fc");
        assert_eq!(site_path(&["events", "x\ny"]), "/events/x%0Ay");
    }

    #[test]
    fn test_site_path_keeps_control_characters() {
        assert_eq!(site_path(&["events", "a\tb"]), "/events/a%09b");
        assert_ne!(site_path(&["events", "x\ny"]), site_path(&["events", "xy"]));
        assert_eq!(site_path(&["events", "50%"]), "/events/50%25");
        assert_eq!(site_path(&["events", "caf\u{e9}"]), "/events/caf%C3%A9");
    }

    #[test]
    fn test_consume_flash_only_when_present() {
        let ctx = RequestContext::default();
        let response = consume_flash(&ctx, false, StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(flash_notices(&ctx).is_empty());

        let ctx = RequestContext {
            token: None,
            flash: Some(Flash::EventUpdated),
        };
        let response = consume_flash(&ctx, false, StatusCode::OK);
        let cookie = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
        assert_eq!(
            flash_notices(&ctx),
            vec![Notice::success("Great ! Success, Event Was Updated")]
        );
    }

    #[test]
    fn test_empty_fields_flash_adds_warning() {
        let ctx = RequestContext {
            token: None,
            flash: Some(Flash::UpdatedWithEmptyFields),
        };
        let notices = flash_notices(&ctx);
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].message, "Great ! Success, Event Was Updated");
        assert_eq!(notices[1], Notice::warning(EMPTY_FIELDS_MESSAGE));
    }
}
