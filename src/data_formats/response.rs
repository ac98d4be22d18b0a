use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{Post, PostDetail, Profile, User};

#[derive(Deserialize, Serialize, Debug)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

/// A user as exposed over HTTP: everything but the password hash.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub phone: Option<String>,
    pub name: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(rename = "followerCount")]
    pub follower_count: i64,
    #[serde(rename = "followingCount")]
    pub following_count: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PostResponse {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub media: Option<String>,
    pub reply_to: Option<i64>,
    pub created_at: NaiveDateTime,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AuthorSummary {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub author: AuthorSummary,
    #[serde(rename = "likesCount")]
    pub likes_count: i64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LikeCountResponse {
    #[serde(rename = "postId")]
    pub post_id: i64,
    pub count: i64,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(
        User {
            id,
            email,
            phone,
            name,
            bio,
            avatar,
            created_at,
            ..
        }: User,
    ) -> Self {
        UserResponse {
            id,
            email,
            phone,
            name,
            bio,
            avatar,
            created_at,
        }
    }
}

impl From<Profile> for ProfileResponse {
    fn from(
        Profile {
            user,
            follower_count,
            following_count,
        }: Profile,
    ) -> Self {
        ProfileResponse {
            user: user.into(),
            follower_count,
            following_count,
        }
    }
}

impl From<Post> for PostResponse {
    fn from(
        Post {
            id,
            user_id,
            content,
            media,
            reply_to,
            created_at,
        }: Post,
    ) -> Self {
        PostResponse {
            id,
            user_id,
            content,
            media,
            reply_to,
            created_at,
        }
    }
}

impl From<PostDetail> for PostDetailResponse {
    fn from(
        PostDetail {
            id,
            user_id,
            content,
            media,
            reply_to,
            created_at,
            author_name,
            author_avatar,
            likes_count,
        }: PostDetail,
    ) -> Self {
        PostDetailResponse {
            post: PostResponse {
                id,
                user_id,
                content,
                media,
                reply_to,
                created_at,
            },
            author: AuthorSummary {
                id: user_id,
                name: author_name,
                avatar: author_avatar,
            },
            likes_count,
        }
    }
}
