use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use shell_shim_api::api::{CommandRequest, CommandResult};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::RunError;
use crate::process::{process, Shell};

/// The complete server, command route plus health check, open to any origin.
pub fn app(shell: Shell) -> Router {
    Router::new()
        .merge(routes(shell))
        .route("/health", get(|| async { "OK" }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Routes of the command endpoint, every request runs through `shell`.
pub fn routes(shell: Shell) -> Router {
    Router::new()
        .route("/run-command", post(run_command))
        .with_state(Arc::new(shell))
}

async fn run_command(
    State(shell): State<Arc<Shell>>,
    request: Result<Json<CommandRequest>, JsonRejection>,
) -> Result<Json<CommandResult>, RunError> {
    let id = fastrand::u64(..);
    log::info!(id; "received command");

    let Json(request) = request.map_err(|rejection| {
        log::warn!(id; "rejected body: {}", rejection.body_text());
        rejection
    })?;
    let Some(line) = request.command() else {
        log::warn!(id; "no command provided");
        return Err(RunError::MissingCommand);
    };
    log::debug!(id; "command: {line}");

    let output = process(id, shell.command(line)).await?;
    Ok(Json(CommandResult::Success { output }))
}
