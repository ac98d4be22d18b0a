use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::StatusCode,
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    authentication::AuthUser,
    db_helpers::{follow_user_in_db, get_profile_in_db, unfollow_user_in_db, update_user_in_db},
    MessageResponse, ProfileResponse, UpdateProfileRequest, UserResponse,
};

use super::{json_body, path_id, JsonResult};

pub async fn get_profile(
    Extension(pool): Extension<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> JsonResult<ProfileResponse> {
    let profile = get_profile_in_db(&pool, path_id(id)?).await?;
    Ok((StatusCode::OK, Json(profile.into())))
}

// The record updated is always the caller's, never one named in the path.
pub async fn update_profile(
    Extension(pool): Extension<SqlitePool>,
    user: AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> JsonResult<UserResponse> {
    let request = json_body(payload)?;
    let updated = update_user_in_db(&pool, user.id, request).await?;
    Ok((StatusCode::OK, Json(updated.into())))
}

pub async fn follow_user(
    Extension(pool): Extension<SqlitePool>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> JsonResult<MessageResponse> {
    follow_user_in_db(&pool, user.id, path_id(id)?).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Followed user successfully")),
    ))
}

pub async fn unfollow_user(
    Extension(pool): Extension<SqlitePool>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> JsonResult<MessageResponse> {
    unfollow_user_in_db(&pool, user.id, path_id(id)?).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Unfollowed user successfully")),
    ))
}
