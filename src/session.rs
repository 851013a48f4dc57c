//! Per-request context read from cookies
//!
//! The session token is issued by the backend at login and stored in the
//! `token` cookie; we only forward it. The `flash` cookie carries a one-shot
//! notice across a redirect.

use axum::http::{header, HeaderMap, HeaderValue};

const TOKEN_COOKIE: &str = "token";
const FLASH_COOKIE: &str = "flash";

/// Bearer credential of the current user
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the credential itself
impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// One-shot notices that survive a redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    EventUpdated,
    /// Updated, but some fields were sent empty
    UpdatedWithEmptyFields,
}

impl Flash {
    pub fn code(&self) -> &'static str {
        match self {
            Flash::EventUpdated => "event-updated",
            Flash::UpdatedWithEmptyFields => "event-updated-empty-fields",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "event-updated" => Some(Flash::EventUpdated),
            "event-updated-empty-fields" => Some(Flash::UpdatedWithEmptyFields),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Flash::EventUpdated | Flash::UpdatedWithEmptyFields => {
                "Great ! Success, Event Was Updated"
            }
        }
    }

    /// `Set-Cookie` value that stores this flash for the next page
    pub fn set_cookie(&self, secure: bool) -> HeaderValue {
        HeaderValue::from_static(match (self, secure) {
            (Flash::EventUpdated, false) => "flash=event-updated; Path=/; HttpOnly; SameSite=Lax",
            (Flash::EventUpdated, true) => {
                "flash=event-updated; Path=/; HttpOnly; SameSite=Lax; Secure"
            }
            (Flash::UpdatedWithEmptyFields, false) => {
                "flash=event-updated-empty-fields; Path=/; HttpOnly; SameSite=Lax"
            }
            (Flash::UpdatedWithEmptyFields, true) => {
                "flash=event-updated-empty-fields; Path=/; HttpOnly; SameSite=Lax; Secure"
            }
        })
    }

    /// `Set-Cookie` value that removes a consumed flash
    pub fn clear_cookie(secure: bool) -> HeaderValue {
        if secure {
            HeaderValue::from_static("flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Secure")
        } else {
            HeaderValue::from_static("flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
        }
    }
}

/// What loaders and actions know about the caller
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub token: Option<SessionToken>,
    pub flash: Option<Flash>,
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut ctx = Self::default();

        for value in headers.get_all(header::COOKIE) {
            let Ok(raw) = value.to_str() else {
                continue;
            };
            for (name, value) in parse_cookies(raw) {
                match name {
                    TOKEN_COOKIE if !value.is_empty() && value != "undefined" => {
                        ctx.token = Some(SessionToken::new(value));
                    }
                    FLASH_COOKIE => ctx.flash = Flash::from_code(value),
                    _ => {}
                }
            }
        }

        ctx
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }
}

/// Split a `Cookie` header into `(name, value)` pairs.
///
/// Surrounding double quotes on a value are dropped. Malformed pairs
/// (no `=`) are skipped.
fn parse_cookies(raw: &str) -> impl Iterator<Item = (&str, &str)> {
    raw.split(';').filter_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        Some((name, value))
    })
}
