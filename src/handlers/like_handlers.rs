use axum::{
    extract::{rejection::PathRejection, Path},
    http::StatusCode,
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    authentication::AuthUser,
    db_helpers::{count_likes_in_db, like_post_in_db, unlike_post_in_db},
    LikeCountResponse, MessageResponse,
};

use super::{path_id, JsonResult};

pub async fn like_post(
    Extension(pool): Extension<SqlitePool>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> JsonResult<MessageResponse> {
    like_post_in_db(&pool, user.id, path_id(id)?).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Post liked successfully")),
    ))
}

pub async fn unlike_post(
    Extension(pool): Extension<SqlitePool>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> JsonResult<MessageResponse> {
    unlike_post_in_db(&pool, user.id, path_id(id)?).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Post unliked successfully")),
    ))
}

pub async fn count_likes(
    Extension(pool): Extension<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> JsonResult<LikeCountResponse> {
    let post_id = path_id(id)?;
    let count = count_likes_in_db(&pool, post_id).await?;
    Ok((StatusCode::OK, Json(LikeCountResponse { post_id, count })))
}
