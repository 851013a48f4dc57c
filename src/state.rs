//! Shared state handed to every handler

use crate::api::ApiClient;
use crate::form::EmptyFieldPolicy;

/// Shared state for the web server.
///
/// Holds no per-user data: session and form state live in the request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Backend client (pooled connections)
    pub api: ApiClient,
    /// How the edit form treats empty fields on submit
    pub empty_fields: EmptyFieldPolicy,
    /// Mark session cookies `Secure` (served behind TLS)
    pub secure_cookies: bool,
}
