//! Tracing setup: stdout plus an optional rotating JSON file
//!
//! Precedence for the filter: RUST_LOG env var > config file > default "info"

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Filter for a configured level: our crate at `level`, request traces
/// from tower-http at debug, axum internals quieter
fn default_filter(level: &str) -> String {
    format!("events_web={},tower_http=debug,axum=info", level)
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop, so the caller must
/// keep it alive for the life of the process.
pub fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&config.level).into());

    let appender = config.file.as_ref().and_then(|sink| match sink.appender() {
        Ok(appender) => Some(appender),
        Err(e) => {
            // Subscriber isn't up yet
            eprintln!("Warning: JSON log file disabled ({:?}): {}", sink.dir, e);
            None
        }
    });

    let Some(appender) = appender else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
        return None;
    };

    // Writes happen on a background thread
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_scopes_crate_level() {
        let filter = default_filter("debug");
        assert!(filter.starts_with("events_web=debug"));
        assert!(filter.parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn test_every_accepted_level_builds_a_filter() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(default_filter(level).parse::<EnvFilter>().is_ok(), "{}", level);
        }
    }
}
