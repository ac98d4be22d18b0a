use sqlx::SqlitePool;

use crate::errors::RequestError;

use super::{missing_post_or_user, violated_constraint, Constraint};

const ALREADY_LIKED: &str = "You have already liked this post";

pub async fn like_post_in_db(
    pool: &SqlitePool,
    user_id: i64,
    post_id: i64,
) -> Result<(), RequestError> {
    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM likes WHERE user_id = ? AND post_id = ?",
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await?;
    if existing.is_some() {
        return Err(RequestError::Conflict(ALREADY_LIKED));
    }

    insert_like(pool, user_id, post_id).await?;
    tracing::info!(user_id, post_id, "post liked");
    Ok(())
}

// Two concurrent likes both pass the check above; the UNIQUE index
// rejects the second insert.
async fn insert_like(pool: &SqlitePool, user_id: i64, post_id: i64) -> Result<(), RequestError> {
    let result = sqlx::query("INSERT INTO likes (user_id, post_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(post_id)
        .execute(pool)
        .await;
    match result {
        Ok(_) => Ok(()),
        Err(e) => match violated_constraint(&e) {
            Some(Constraint::Unique(_)) => Err(RequestError::Conflict(ALREADY_LIKED)),
            Some(Constraint::ForeignKey) => Err(missing_post_or_user(pool, post_id).await),
            None => Err(RequestError::from(e)),
        },
    }
}

pub async fn unlike_post_in_db(
    pool: &SqlitePool,
    user_id: i64,
    post_id: i64,
) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM likes WHERE user_id = ? AND post_id = ?")
        .bind(user_id)
        .bind(post_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::validation("You have not liked this post"));
    }

    tracing::info!(user_id, post_id, "post unliked");
    Ok(())
}

pub async fn count_likes_in_db(pool: &SqlitePool, post_id: i64) -> Result<i64, RequestError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = ?")
        .bind(post_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
