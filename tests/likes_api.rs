mod common;

use common::{message, spawn_app};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn like_twice_then_unlike_twice() {
    let app = spawn_app().await;
    let ana = app.create_user("ana@x.com", "Ana").await;
    let post_id = app.create_post(&ana, "likeable").await;
    let like = format!("/api/likes/{post_id}/like");
    let unlike = format!("/api/likes/{post_id}/unlike");

    let response = app.post(&like, Some(&ana.token), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(message(response).await, "Post liked successfully");

    let response = app.post(&like, Some(&ana.token), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "You have already liked this post");

    let response = app.post(&unlike, Some(&ana.token), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(message(response).await, "Post unliked successfully");

    let response = app.post(&unlike, Some(&ana.token), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "You have not liked this post");
}

#[tokio::test]
async fn like_count_tracks_likes() {
    let app = spawn_app().await;
    let ana = app.create_user("ana@x.com", "Ana").await;
    let bob = app.create_user("bob@x.com", "Bob").await;
    let post_id = app.create_post(&ana, "count me").await;

    for user in [&ana, &bob] {
        app.post(&format!("/api/likes/{post_id}/like"), Some(&user.token), json!({}))
            .await;
    }
    let count: Value = app
        .get(&format!("/api/likes/{post_id}/count"), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(count, json!({ "postId": post_id, "count": 2 }));

    app.post(&format!("/api/likes/{post_id}/unlike"), Some(&bob.token), json!({}))
        .await;
    let count: Value = app
        .get(&format!("/api/likes/{post_id}/count"), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn liking_missing_post_is_400() {
    let app = spawn_app().await;
    let ana = app.create_user("ana@x.com", "Ana").await;
    let response = app
        .post("/api/likes/999/like", Some(&ana.token), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn like_requires_token() {
    let app = spawn_app().await;
    let response = app.post("/api/likes/1/like", None, json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn concurrent_duplicate_likes_leave_one_row() {
    let app = spawn_app().await;
    let ana = app.create_user("ana@x.com", "Ana").await;
    let post_id = app.create_post(&ana, "race").await;
    let like = format!("/api/likes/{post_id}/like");

    let (first, second) = tokio::join!(
        app.post(&like, Some(&ana.token), json!({})),
        app.post(&like, Some(&ana.token), json!({})),
    );
    let mut statuses = vec![first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::BAD_REQUEST]);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = ?")
        .bind(post_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}
