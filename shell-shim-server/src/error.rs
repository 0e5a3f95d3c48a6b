use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shell_shim_api::api::{CommandResult, NO_COMMAND_PROVIDED};

/// Everything that keeps `/run-command` from answering with `200`.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The `command` field was absent, `null` or empty.
    #[error("{}", NO_COMMAND_PROVIDED)]
    MissingCommand,
    /// The body was no json object with a text `command`.
    #[error("{}", .0.body_text())]
    MalformedBody(#[from] JsonRejection),
    /// The command ran and exited with a non-zero status.
    #[error("{stderr}")]
    CommandFailed { stderr: String },
    /// The shell could not be started.
    #[error("{0}")]
    Spawn(#[from] std::io::Error),
}

impl RunError {
    pub fn status(&self) -> StatusCode {
        match self {
            RunError::MissingCommand | RunError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            RunError::CommandFailed { .. } | RunError::Spawn(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RunError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = CommandResult::Failure {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
