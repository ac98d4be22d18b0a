use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, http::StatusCode, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    config::Config,
    db_helpers::{login_user_in_db, register_user_in_db},
    errors::RequestError,
    LoginRequest, RegisterRequest, TokenResponse,
};

use super::{json_body, JsonResult};

pub async fn register_user(
    Extension(pool): Extension<SqlitePool>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, &'static str), RequestError> {
    let request = json_body(payload)?;
    register_user_in_db(&pool, request).await?;
    Ok((StatusCode::CREATED, "User registered successfully"))
}

pub async fn login_user(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> JsonResult<TokenResponse> {
    let request = json_body(payload)?;
    let token = login_user_in_db(&pool, &config, request).await?;
    Ok((StatusCode::OK, Json(TokenResponse { token })))
}
