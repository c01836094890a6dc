use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors surfaced at the HTTP boundary
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Missing '{0}' parameter")]
    MissingParameter(&'static str),

    /// No exact title match; carries the fuzzy suggestions for the client
    #[error("Movie not found")]
    MovieNotFound { suggestions: Vec<String> },

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MissingParameter(_) => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            AppError::MovieNotFound { suggestions } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "Movie not found",
                    "suggestions": suggestions
                }),
            ),
            AppError::Internal(details) => {
                tracing::error!(details = %details, "Unexpected error while serving request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Internal server error",
                        "details": details
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
