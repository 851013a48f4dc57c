//! Router and server lifecycle

use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::api::ApiClient;
use crate::config::Config;
use crate::pages::{self, dashboard, edit, events, search};
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(pages::root))
        .route("/health", get(pages::health))
        // Public pages
        .route("/events", get(events::list))
        .route("/events/search", get(search::show))
        .route("/events/:slug", get(events::detail))
        // Edit form
        .route("/events/edit/:id", get(edit::show).post(edit::submit))
        .route(
            "/events/edit/:id/image",
            post(edit::upload_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        // Account
        .route("/account/dashboard", get(dashboard::show))
        .route(
            "/account/dashboard/events/:id/delete",
            get(dashboard::confirm_delete).post(dashboard::delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build shared state from config
pub fn app_state(config: &Config) -> Result<AppState> {
    let api = ApiClient::new(
        &config.api_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    Ok(AppState {
        api,
        empty_fields: config.forms.empty_fields,
        secure_cookies: config.secure_cookies,
    })
}

/// Start the web server; returns once `shutdown_rx` fires and in-flight
/// requests have drained
pub async fn start_server(
    config: Config,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> Result<()> {
    let bind_addr = config.bind_addr;
    let state = app_state(&config)?;

    tracing::info!(
        "Using events API at {} (empty fields: {})",
        state.api.base_url(),
        state.empty_fields.as_str()
    );

    let app = router(state, config.max_upload_bytes);

    let listener = TcpListener::bind(bind_addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_rx.await.ok();
        })
        .await
        .context("Server error")?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}
