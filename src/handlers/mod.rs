use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::{StatusCode, Uri},
    Json,
};

use crate::{errors::RequestError, JsonResponse, MessageResponse};

mod auth_handlers;
mod like_handlers;
mod post_handlers;
mod search_handlers;
mod user_handlers;

pub use auth_handlers::*;
pub use like_handlers::*;
pub use post_handlers::*;
pub use search_handlers::*;
pub use user_handlers::*;

type JsonResult<T> = Result<JsonResponse<T>, RequestError>;

// Bad bodies and ids get the same `{message}` shape as every other error
// instead of axum's plain-text rejections.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, RequestError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(RequestError::validation(rejection.body_text())),
    }
}

fn path_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, RequestError> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => Err(RequestError::validation(rejection.body_text())),
    }
}

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> JsonResponse<MessageResponse> {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse::new(format!(
            "URL {} provided was not found",
            uri
        ))),
    )
}
