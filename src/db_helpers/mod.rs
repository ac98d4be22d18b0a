use sqlx::SqlitePool;

use crate::{errors::RequestError, models::User};

mod auth_helpers;
mod like_helpers;
mod post_helpers;
mod profile_helpers;
mod search_helpers;
mod user_helpers;

pub use auth_helpers::*;
pub use like_helpers::*;
pub use post_helpers::*;
pub use profile_helpers::*;
pub use search_helpers::*;
pub use user_helpers::*;

const USER_COLUMNS: &str = "id, email, phone, password, name, bio, avatar, created_at";
const POST_COLUMNS: &str = "id, user_id, content, media, reply_to, created_at";

/// Builds the `col = ?` list of a dynamic UPDATE from the fields that are set.
struct QueryBuilder {
    query: String,
    params: Vec<Option<String>>,
    seperator: &'static str,
}

impl QueryBuilder {
    fn new(initial: &str, seperator: &'static str) -> Self {
        Self {
            query: initial.to_owned(),
            params: vec![],
            seperator,
        }
    }

    fn push_column(&mut self, column: &str, value: Option<String>) {
        if !self.params.is_empty() {
            self.query.push_str(self.seperator);
        }
        self.query.push_str(column);
        self.query.push_str(" = ?");
        self.params.push(value);
    }

    fn add_param(mut self, column: &str, param: Option<String>) -> Self {
        if let Some(value) = param {
            self.push_column(column, Some(value));
        }
        self
    }

    /// `Some(None)` sets the column to NULL, `None` leaves it untouched.
    fn add_nullable_param(mut self, column: &str, param: Option<Option<String>>) -> Self {
        if let Some(value) = param {
            self.push_column(column, value);
        }
        self
    }

    fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    fn build(self) -> (String, Vec<Option<String>>) {
        (self.query, self.params)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        return Err(RequestError::validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) enum Constraint {
    /// Carries the driver message, which names the offending columns.
    Unique(String),
    ForeignKey,
}

pub(crate) fn violated_constraint(error: &sqlx::Error) -> Option<Constraint> {
    if let sqlx::Error::Database(e) = error {
        let message = e.message();
        if message.contains("UNIQUE constraint failed") {
            return Some(Constraint::Unique(message.to_owned()));
        }
        if message.contains("FOREIGN KEY constraint failed") {
            return Some(Constraint::ForeignKey);
        }
    }
    None
}

// ----------------- Helper Functions -----------------

async fn post_exists(pool: &SqlitePool, post_id: i64) -> Result<bool, RequestError> {
    let post = sqlx::query_scalar::<_, i64>("SELECT id FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(pool)
        .await?;
    Ok(post.is_some())
}

/// Picks the message for a FOREIGN KEY failure on a row that references both
/// a user and `post_id`.
async fn missing_post_or_user(pool: &SqlitePool, post_id: i64) -> RequestError {
    match post_exists(pool, post_id).await {
        Ok(true) => RequestError::validation("User not found"),
        Ok(false) => RequestError::validation("Post not found"),
        Err(e) => e,
    }
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let result = sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
    let result = sqlx::query_as::<_, User>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqlitePool;

    use crate::{init_db, Config};

    pub async fn test_pool() -> SqlitePool {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "unit-test-secret".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            max_connections: 1,
        };
        init_db(&config).await.unwrap()
    }

    pub async fn insert_user(pool: &SqlitePool, email: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("INSERT INTO users (email, password, name) VALUES (?, 'x', 'Test') RETURNING id")
            .bind(email)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    pub async fn insert_post(pool: &SqlitePool, user_id: i64) -> i64 {
        sqlx::query_scalar::<_, i64>("INSERT INTO posts (user_id, content) VALUES (?, 'hello') RETURNING id")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_query_builder_skips_unset_fields() {
        let (query, params) = QueryBuilder::new("UPDATE users SET ", ", ")
            .add_param("name", Some("Ana".into()))
            .add_param("bio", None)
            .add_param("avatar", Some("ana.png".into()))
            .build();
        assert_eq!(query, "UPDATE users SET name = ?, avatar = ?");
        assert_eq!(params, vec![Some("Ana".to_string()), Some("ana.png".to_string())]);
    }

    #[test]
    fn test_query_builder_nullable_param() {
        let (query, params) = QueryBuilder::new("UPDATE users SET ", ", ")
            .add_nullable_param("phone", Some(None))
            .add_nullable_param("bio", None)
            .build();
        assert_eq!(query, "UPDATE users SET phone = ?");
        assert_eq!(params, vec![None]);
    }

    #[test]
    fn test_query_builder_empty() {
        let builder = QueryBuilder::new("UPDATE users SET ", ", ").add_param("bio", None);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("name", "Ana").is_ok());
        let error = require("name", "   ").unwrap_err();
        assert_eq!(error.to_string(), "name is required");
    }

    #[test]
    fn test_non_database_errors_are_not_constraints() {
        assert!(violated_constraint(&sqlx::Error::RowNotFound).is_none());
    }

    #[tokio::test]
    async fn test_duplicate_like_is_unique_violation() {
        let pool = test_pool().await;
        let user = insert_user(&pool, "ana@x.com").await;
        let post = insert_post(&pool, user).await;

        let insert = "INSERT INTO likes (user_id, post_id) VALUES (?, ?)";
        sqlx::query(insert).bind(user).bind(post).execute(&pool).await.unwrap();
        let error = sqlx::query(insert)
            .bind(user)
            .bind(post)
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(matches!(
            violated_constraint(&error),
            Some(Constraint::Unique(message)) if message.contains("likes.user_id")
        ));
    }

    #[tokio::test]
    async fn test_duplicate_follow_is_unique_violation() {
        let pool = test_pool().await;
        let ana = insert_user(&pool, "ana@x.com").await;
        let bob = insert_user(&pool, "bob@x.com").await;

        let insert = "INSERT INTO follows (follower_id, following_id) VALUES (?, ?)";
        sqlx::query(insert).bind(ana).bind(bob).execute(&pool).await.unwrap();
        let error = sqlx::query(insert)
            .bind(ana)
            .bind(bob)
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(matches!(
            violated_constraint(&error),
            Some(Constraint::Unique(message)) if message.contains("follows.follower_id")
        ));
    }

    #[tokio::test]
    async fn test_dangling_reference_is_foreign_key_violation() {
        let pool = test_pool().await;
        let user = insert_user(&pool, "ana@x.com").await;

        let error = sqlx::query("INSERT INTO likes (user_id, post_id) VALUES (?, 999)")
            .bind(user)
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(matches!(
            violated_constraint(&error),
            Some(Constraint::ForeignKey)
        ));
    }

    #[tokio::test]
    async fn test_missing_post_or_user() {
        let pool = test_pool().await;
        let user = insert_user(&pool, "ana@x.com").await;
        let post = insert_post(&pool, user).await;

        assert_eq!(
            missing_post_or_user(&pool, post).await.to_string(),
            "User not found"
        );
        assert_eq!(
            missing_post_or_user(&pool, post + 1).await.to_string(),
            "Post not found"
        );
    }
}
