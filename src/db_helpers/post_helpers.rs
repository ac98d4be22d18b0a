use sqlx::SqlitePool;

use crate::{
    data_formats::{CreatePostRequest, ReplyRequest},
    errors::RequestError,
    models::{Post, PostDetail},
};

use super::{missing_post_or_user, violated_constraint, Constraint, POST_COLUMNS};

pub const MAX_POST_LENGTH: usize = 280;

const POST_DETAIL_QUERY: &str = r#"
            SELECT posts.id                                    AS "id",
                   posts.user_id                               AS "user_id",
                   posts.content                               AS "content",
                   posts.media                                 AS "media",
                   posts.reply_to                              AS "reply_to",
                   posts.created_at                            AS "created_at",
                   users.name                                  AS "author_name",
                   users.avatar                                AS "author_avatar",
                   (SELECT Count(*)
                    FROM   likes
                    WHERE  likes.post_id = posts.id)          AS "likes_count"
            FROM   posts
                   JOIN users
                     ON users.id = posts.user_id
            WHERE  posts.id = $1
"#;

/// Own posts plus posts of everyone the user follows.
const FEED_QUERY: &str = r#"
            SELECT id, user_id, content, media, reply_to, created_at
            FROM   posts
            WHERE  user_id IN (SELECT following_id
                               FROM   follows
                               WHERE  follower_id = $1)
                    OR user_id = $1
            ORDER  BY created_at DESC, id DESC
"#;

fn checked_content(content: Option<String>) -> Result<String, RequestError> {
    let content = match content {
        Some(content) => content,
        None => return Err(RequestError::validation("content is required")),
    };
    // Length is counted in characters, not bytes.
    if content.chars().count() > MAX_POST_LENGTH {
        return Err(RequestError::validation(format!(
            "Content exceeds the {MAX_POST_LENGTH} character limit"
        )));
    }
    Ok(content)
}

async fn insert_post(
    pool: &SqlitePool,
    author_id: i64,
    content: String,
    media: Option<String>,
    reply_to: Option<i64>,
) -> Result<Post, RequestError> {
    let query = format!(
        "INSERT INTO posts (user_id, content, media, reply_to) VALUES (?, ?, ?, ?) RETURNING {POST_COLUMNS}"
    );
    let result = sqlx::query_as::<_, Post>(&query)
        .bind(author_id)
        .bind(content)
        .bind(media)
        .bind(reply_to)
        .fetch_one(pool)
        .await;
    match result {
        Ok(post) => Ok(post),
        Err(e) => match (violated_constraint(&e), reply_to) {
            (Some(Constraint::ForeignKey), Some(parent_id)) => {
                Err(missing_post_or_user(pool, parent_id).await)
            }
            (Some(Constraint::ForeignKey), None) => Err(RequestError::validation("User not found")),
            _ => Err(RequestError::from(e)),
        },
    }
}

pub async fn create_post_in_db(
    pool: &SqlitePool,
    author_id: i64,
    CreatePostRequest { content, media }: CreatePostRequest,
) -> Result<Post, RequestError> {
    let content = checked_content(content)?;
    let post = insert_post(pool, author_id, content, media, None).await?;
    tracing::info!(post_id = post.id, author_id, "post created");
    Ok(post)
}

/// Inserts a reply. The parent is not looked up first; the reply_to foreign
/// key rejects a dangling parent.
pub async fn reply_to_post_in_db(
    pool: &SqlitePool,
    author_id: i64,
    parent_id: i64,
    ReplyRequest { content }: ReplyRequest,
) -> Result<Post, RequestError> {
    let content = checked_content(content)?;
    let post = insert_post(pool, author_id, content, None, Some(parent_id)).await?;
    tracing::info!(post_id = post.id, parent_id, author_id, "reply created");
    Ok(post)
}

pub async fn get_post_in_db(pool: &SqlitePool, post_id: i64) -> Result<PostDetail, RequestError> {
    let post = sqlx::query_as::<_, PostDetail>(POST_DETAIL_QUERY)
        .bind(post_id)
        .fetch_optional(pool)
        .await?;
    match post {
        Some(post) => Ok(post),
        None => Err(RequestError::NotFound("Post not found")),
    }
}

pub async fn get_user_posts_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<Post>, RequestError> {
    let query =
        format!("SELECT {POST_COLUMNS} FROM posts WHERE user_id = ? ORDER BY created_at DESC, id DESC");
    let posts = sqlx::query_as::<_, Post>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(posts)
}

pub async fn get_feed_in_db(pool: &SqlitePool, user_id: i64) -> Result<Vec<Post>, RequestError> {
    let posts = sqlx::query_as::<_, Post>(FEED_QUERY)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(posts)
}
