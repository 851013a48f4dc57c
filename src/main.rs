// Events web - server-rendered event pages
//
// Serves the dashboard, edit form, search and listing pages. Every page is
// rendered from data fetched on the request path from the events REST API.
//
// Architecture:
// - Web server (axum): routes browser requests to page handlers
// - API client (reqwest): talks to the events backend
// - Views (askama): HTML templates compiled into the binary

use anyhow::Result;
use clap::Parser;
use events_web::{cli, config::Config, logging, server};

#[tokio::main]
async fn main() -> Result<()> {
    // Subcommands (config, check) run and exit; no subcommand serves
    let args = cli::Cli::parse();
    if cli::run(args.command).await? == cli::Next::Exit {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env()?;

    // The guard must be kept alive for the duration of the program to ensure logs flush
    let _file_guard = logging::init_tracing(&config.logging);

    tracing::info!("events-web v{}", events_web::config::VERSION);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let server_config = config.clone();
    let mut server_handle =
        tokio::spawn(async move { server::start_server(server_config, shutdown_rx).await });

    // Run until Ctrl+C, or until the server stops on its own (e.g. bind failure)
    tokio::select! {
        result = &mut server_handle => {
            return result?;
        }
        result = tokio::signal::ctrl_c() => {
            result?;
        }
    }

    tracing::info!("Shutting down...");

    // Signal graceful shutdown and wait for in-flight requests to drain
    let _ = shutdown_tx.send(());
    server_handle.await??;

    Ok(())
}
