use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use edusync_completion::CompletionError;
use edusync_db::DbError;
use edusync_types::api::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Database(db_err) => match db_err {
                DbError::DuplicateUser(_) => StatusCode::CONFLICT,
                DbError::UnknownUser(_) => StatusCode::NOT_FOUND,
                DbError::MissingField(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Completion(CompletionError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Self::Completion(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the browser; internal detail is only logged.
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest(m) | Self::Unauthorized(m) | Self::Forbidden(m) => m.clone(),
            Self::Database(db_err) => match db_err {
                DbError::DuplicateUser(_) => "Username already exists".to_string(),
                DbError::UnknownUser(id) => format!("User {id} not found"),
                DbError::MissingField(field) => format!("Missing {field}"),
                _ => "Database error occurred".to_string(),
            },
            Self::Completion(CompletionError::Timeout) => {
                "The completion service timed out".to_string()
            }
            Self::Completion(_) => "The completion service failed".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{} {}", status, self);
        } else {
            warn!("{} {}", status, self);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.user_message(),
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
