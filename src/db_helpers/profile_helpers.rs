use sqlx::SqlitePool;

use crate::{errors::RequestError, models::Profile};

use super::{get_user_by_id, violated_constraint, Constraint};

pub async fn get_profile_in_db(pool: &SqlitePool, user_id: i64) -> Result<Profile, RequestError> {
    let user = match get_user_by_id(pool, user_id).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };

    let follower_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE following_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    let following_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    Ok(Profile {
        user,
        follower_count,
        following_count,
    })
}

async fn is_following(
    pool: &SqlitePool,
    follower_id: i64,
    following_id: i64,
) -> Result<bool, RequestError> {
    let edge = sqlx::query_scalar::<_, i64>(
        "SELECT 1 FROM follows WHERE follower_id = ? AND following_id = ?",
    )
    .bind(follower_id)
    .bind(following_id)
    .fetch_optional(pool)
    .await?;
    Ok(edge.is_some())
}

const ALREADY_FOLLOWING: &str = "Already following this user";

/// Adds the follower -> following edge. Following oneself is allowed.
pub async fn follow_user_in_db(
    pool: &SqlitePool,
    follower_id: i64,
    following_id: i64,
) -> Result<(), RequestError> {
    if is_following(pool, follower_id, following_id).await? {
        return Err(RequestError::Conflict(ALREADY_FOLLOWING));
    }

    insert_follow(pool, follower_id, following_id).await?;
    tracing::info!(follower_id, following_id, "user followed");
    Ok(())
}

// A concurrent duplicate loses on the primary key and gets the same answer.
async fn insert_follow(
    pool: &SqlitePool,
    follower_id: i64,
    following_id: i64,
) -> Result<(), RequestError> {
    sqlx::query("INSERT INTO follows (follower_id, following_id) VALUES (?, ?)")
        .bind(follower_id)
        .bind(following_id)
        .execute(pool)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some(Constraint::Unique(_)) => RequestError::Conflict(ALREADY_FOLLOWING),
            Some(Constraint::ForeignKey) => RequestError::validation("User not found"),
            None => RequestError::from(e),
        })?;
    Ok(())
}

pub async fn unfollow_user_in_db(
    pool: &SqlitePool,
    follower_id: i64,
    following_id: i64,
) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND following_id = ?")
        .bind(follower_id)
        .bind(following_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::validation("Not following this user"));
    }

    tracing::info!(follower_id, following_id, "user unfollowed");
    Ok(())
}
