use axum::{
    extract::{rejection::QueryRejection, Query},
    http::StatusCode,
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    db_helpers::{search_hashtags_in_db, search_posts_in_db, search_users_in_db},
    errors::RequestError,
    PostResponse, SearchParams, UserResponse,
};

use super::JsonResult;

fn search_term(params: Result<Query<SearchParams>, QueryRejection>) -> Result<String, RequestError> {
    match params {
        Ok(Query(SearchParams { q: Some(q) })) if !q.is_empty() => Ok(q),
        _ => Err(RequestError::validation("Query parameter is required")),
    }
}

pub async fn search_users(
    Extension(pool): Extension<SqlitePool>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> JsonResult<Vec<UserResponse>> {
    let q = search_term(params)?;
    let users = search_users_in_db(&pool, &q).await?;
    Ok((
        StatusCode::OK,
        Json(users.into_iter().map(UserResponse::from).collect()),
    ))
}

pub async fn search_posts(
    Extension(pool): Extension<SqlitePool>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> JsonResult<Vec<PostResponse>> {
    let q = search_term(params)?;
    let posts = search_posts_in_db(&pool, &q).await?;
    Ok((
        StatusCode::OK,
        Json(posts.into_iter().map(PostResponse::from).collect()),
    ))
}

pub async fn search_hashtags(
    Extension(pool): Extension<SqlitePool>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> JsonResult<Vec<PostResponse>> {
    let q = search_term(params)?;
    let posts = search_hashtags_in_db(&pool, &q).await?;
    Ok((
        StatusCode::OK,
        Json(posts.into_iter().map(PostResponse::from).collect()),
    ))
}
