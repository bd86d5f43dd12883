//! voxroom binary: terminal voice-chat client.
//!
//! Loads configuration, sends logs to a file, probes the backend once, and
//! hands the terminal to the UI until the user quits.

use std::process::ExitCode;
use voxroom_backend::BackendClient;
use voxroom_client::{config, init_tracing, tui, App};
use voxroom_voice::LiveKitConnector;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("VOXROOM_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("voxroom.toml"));

    let config = match config::load_config(selected_config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("voxroom: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("voxroom: cannot open log file {}: {e}", config.logging.file);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        backend = %config.backend.base_url,
        "resolved startup configuration"
    );

    let backend = BackendClient::new(&config.backend.base_url);

    let probe = backend.clone();
    tokio::spawn(async move {
        match probe.health().await {
            Ok(health) => tracing::info!(status = %health.status, "backend reachable"),
            Err(e) => tracing::warn!(error = %e, "backend health check failed"),
        }
    });

    let (app, events) = App::new(
        backend,
        LiveKitConnector::new(),
        config.media.clone(),
        config.upload.clone(),
    );

    match tui::run(app, events).await {
        Ok(()) => {
            tracing::info!("voxroom shut down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "terminal error");
            eprintln!("voxroom: terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}
