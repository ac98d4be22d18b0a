use sqlx::SqlitePool;

use crate::{
    errors::RequestError,
    models::{Post, User},
};

use super::{POST_COLUMNS, USER_COLUMNS};

// SQLite's LIKE only folds ASCII case. ASCII queries are matched in SQL;
// anything else is matched here after lowercasing both sides.

/// `%query%` with the LIKE wildcards in `query` taken literally.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub async fn search_users_in_db(pool: &SqlitePool, query: &str) -> Result<Vec<User>, RequestError> {
    if !query.is_ascii() {
        let sql = format!("SELECT {USER_COLUMNS} FROM users");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
        return Ok(users
            .into_iter()
            .filter(|user| contains_folded(&user.name, query) || contains_folded(&user.email, query))
            .collect());
    }

    let sql = format!(
        r"SELECT {USER_COLUMNS} FROM users WHERE name LIKE $1 ESCAPE '\' OR email LIKE $1 ESCAPE '\'"
    );
    let users = sqlx::query_as::<_, User>(&sql)
        .bind(like_pattern(query))
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn search_posts_in_db(pool: &SqlitePool, query: &str) -> Result<Vec<Post>, RequestError> {
    search_content(pool, query).await
}

/// Matches `#<query>` anywhere in the content. The `#` is always prepended,
/// so a query of `#rust` looks for `##rust`.
pub async fn search_hashtags_in_db(
    pool: &SqlitePool,
    query: &str,
) -> Result<Vec<Post>, RequestError> {
    search_content(pool, &format!("#{query}")).await
}

async fn search_content(pool: &SqlitePool, needle: &str) -> Result<Vec<Post>, RequestError> {
    if !needle.is_ascii() {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts");
        let posts = sqlx::query_as::<_, Post>(&sql).fetch_all(pool).await?;
        return Ok(posts
            .into_iter()
            .filter(|post| contains_folded(&post.content, needle))
            .collect());
    }

    let sql = format!(r"SELECT {POST_COLUMNS} FROM posts WHERE content LIKE ? ESCAPE '\'");
    let posts = sqlx::query_as::<_, Post>(&sql)
        .bind(like_pattern(needle))
        .fetch_all(pool)
        .await?;
    Ok(posts)
}
