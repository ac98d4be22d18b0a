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
    db_helpers::{
        create_post_in_db, get_feed_in_db, get_post_in_db, get_user_posts_in_db,
        reply_to_post_in_db,
    },
    CreatePostRequest, PostDetailResponse, PostResponse, ReplyRequest,
};

use super::{json_body, path_id, JsonResult};

pub async fn create_post(
    Extension(pool): Extension<SqlitePool>,
    user: AuthUser,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> JsonResult<PostResponse> {
    let request = json_body(payload)?;
    let post = create_post_in_db(&pool, user.id, request).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

pub async fn get_post(
    Extension(pool): Extension<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> JsonResult<PostDetailResponse> {
    let post = get_post_in_db(&pool, path_id(id)?).await?;
    Ok((StatusCode::OK, Json(post.into())))
}

pub async fn get_user_posts(
    Extension(pool): Extension<SqlitePool>,
    user_id: Result<Path<i64>, PathRejection>,
) -> JsonResult<Vec<PostResponse>> {
    let posts = get_user_posts_in_db(&pool, path_id(user_id)?).await?;
    Ok((
        StatusCode::OK,
        Json(posts.into_iter().map(PostResponse::from).collect()),
    ))
}

pub async fn get_feed(
    Extension(pool): Extension<SqlitePool>,
    user: AuthUser,
) -> JsonResult<Vec<PostResponse>> {
    let posts = get_feed_in_db(&pool, user.id).await?;
    Ok((
        StatusCode::OK,
        Json(posts.into_iter().map(PostResponse::from).collect()),
    ))
}

pub async fn reply_to_post(
    Extension(pool): Extension<SqlitePool>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ReplyRequest>, JsonRejection>,
) -> JsonResult<PostResponse> {
    let parent_id = path_id(id)?;
    let request = json_body(payload)?;
    let reply = reply_to_post_in_db(&pool, user.id, parent_id, request).await?;
    Ok((StatusCode::CREATED, Json(reply.into())))
}
