use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::JsonResponse;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),
    /// A unique field or edge already exists.
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    /// Missing, malformed, invalid or expired bearer token.
    #[error("{0}")]
    Unauthenticated(&'static str),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Internal Server Error")]
    ServerError,
    #[error(transparent)]
    DatabaseError(#[from] sqlx::Error),
}

#[derive(Debug, Serialize)]
pub struct RequestErrorJson {
    message: String,
}

impl RequestErrorJson {
    pub fn new(message: impl Into<String>) -> RequestErrorJson {
        RequestErrorJson {
            message: message.into(),
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Validation(_) | RequestError::Conflict(_) => StatusCode::BAD_REQUEST,
            RequestError::NotFound(_) => StatusCode::NOT_FOUND,
            RequestError::Unauthenticated(_) | RequestError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            RequestError::ServerError | RequestError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJson> {
        if let RequestError::DatabaseError(e) = self {
            tracing::error!(error = %e, "database error");
        }
        // Database failures go out with the raw driver message.
        (self.status_code(), Json(RequestErrorJson::new(self.to_string())))
    }
}
