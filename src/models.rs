use chrono::NaiveDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub phone: Option<String>,
    /// Argon2 PHC string, never serialized.
    pub password: String,
    pub name: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub media: Option<String>,
    pub reply_to: Option<i64>,
    pub created_at: NaiveDateTime,
}

/// A post joined with its author's summary and like count.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostDetail {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub media: Option<String>,
    pub reply_to: Option<i64>,
    pub created_at: NaiveDateTime,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub likes_count: i64,
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub follower_count: i64,
    pub following_count: i64,
}
