//! HTTP surface for the contact page.
//!
//! `GET <route>` serves the initial form, `POST <route>` runs the submission
//! through [`formgate_core::SubmissionValidator`] and answers with the
//! verdict's status code.

pub mod app;
pub mod config;
pub mod delivery;
pub mod form_body;
pub mod telemetry;

pub use app::{router, AppState, BodyErrorResponse, FormResponse, SubmitResponse};
pub use config::ServerConfig;
pub use telemetry::{init_tracing, LogFormat};

use anyhow::Context;

/// Build state from `config` and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let addr = config.bind.clone();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr()?;

    tracing::info!(
        addr = %local,
        route = %config.route,
        honeypot = state.validator.honeypot().enabled,
        notifier = state.notifier.name(),
        "formgate listening"
    );

    axum::serve(listener, router(state.into(), &config))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown requested");
            }
        })
        .await
        .context("server error")
}
