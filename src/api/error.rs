//! Backend API error types

use reqwest::StatusCode;

/// Message shown whenever the backend refuses a call with 401/403
pub const UNAUTHORIZED_MESSAGE: &str =
    "Wow An Error : Unauthorized ! It Seems That You are not An Owner Of This Event";

/// Message shown when nothing more specific is available
pub const GENERIC_MESSAGE: &str = "Wow An Error ! Something Went Wrong";

/// Closed classification of backend failures.
///
/// Every page and action branches on this, never on raw status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 401 or 403: the caller isn't logged in or doesn't own the event
    Unauthorized,
    /// Any other non-2xx answer from the backend
    Rejected,
    /// The backend couldn't be reached or answered with something unreadable
    Unavailable,
}

/// Errors returned by [`super::ApiClient`]
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized ({status})")]
    Unauthorized { status: StatusCode },
    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("backend unreachable: {0}")]
    Network(String),
    #[error("unreadable backend response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success response from its status and raw body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return ApiError::Unauthorized { status };
        }
        ApiError::Rejected {
            status,
            message: backend_message(body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ApiError::Rejected { .. } => ErrorKind::Rejected,
            ApiError::Network(_) | ApiError::Decode(_) => ErrorKind::Unavailable,
        }
    }

    /// Text for the user: the backend's own message where it sent one
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { .. } => UNAUTHORIZED_MESSAGE.to_string(),
            ApiError::Rejected { message, .. } => message.clone(),
            ApiError::Network(_) | ApiError::Decode(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": "..."}`, the nested
/// `{"message": [{"messages": [{"message": "..."}]}]}` validation shape,
/// and falls back to `{"error": "..."}`.
fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let from_message = match value.get("message") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.get("messages")?.as_array())
            .flatten()
            .filter_map(|m| m.get("message")?.as_str())
            .next()
            .map(String::from),
        _ => None,
    };

    from_message
        .or_else(|| value.get("error")?.as_str().map(String::from))
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_and_403_are_unauthorized() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = ApiError::from_response(status, r#"{"message":"Forbidden"}"#);
            assert_eq!(err.kind(), ErrorKind::Unauthorized);
            assert_eq!(err.user_message(), UNAUTHORIZED_MESSAGE);
        }
    }

    #[test]
    fn test_rejected_carries_backend_message() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"statusCode":400,"error":"Bad Request","message":"Event is locked"}"#,
        );
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert_eq!(err.user_message(), "Event is locked");
    }

    #[test]
    fn test_nested_validation_message() {
        let body = r#"{"message":[{"messages":[{"id":"x","message":"Name is required"}]}]}"#;
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.user_message(), "Name is required");
    }

    #[test]
    fn test_falls_back_to_error_field_then_reason() {
        let err = ApiError::from_response(StatusCode::NOT_FOUND, r#"{"error":"Not Found"}"#);
        assert_eq!(err.user_message(), "Not Found");

        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.user_message(), "Internal Server Error");
    }

    #[test]
    fn test_network_failures_are_unavailable() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(err.user_message(), GENERIC_MESSAGE);
        assert_eq!(ApiError::Decode("eof".into()).kind(), ErrorKind::Unavailable);
    }
}
