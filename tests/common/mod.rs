#![allow(dead_code)]

use std::net::TcpListener;

use chirp::{build_app, init_db, verify_token, Config};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use sqlx::SqlitePool;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "correct horse battery staple";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub pool: SqlitePool,
}

pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub token: String,
}

pub fn test_config() -> Config {
    Config {
        // One connection keeps every query on the same in-memory database.
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        max_connections: 1,
    }
}

pub async fn spawn_app() -> TestApp {
    let config = test_config();
    let pool = init_db(&config).await.expect("failed to set up database");
    let app = build_app(pool.clone(), config);

    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind random port");
    let address = listener.local_addr().unwrap();
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(app.into_make_service());
    tokio::spawn(server);

    TestApp {
        address: format!("http://{}", address),
        client: reqwest::Client::new(),
        pool,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Response {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("request failed")
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Response {
        let mut request = self.client.post(self.url(path)).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("request failed")
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Response {
        let mut request = self.client.put(self.url(path)).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("request failed")
    }

    pub async fn register(&self, email: &str, name: &str, password: &str) -> Response {
        self.post(
            "/api/auth/register",
            None,
            json!({ "email": email, "password": password, "name": name }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post(
            "/api/auth/login",
            None,
            json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Registers a user, logs in and returns its id and bearer token.
    pub async fn create_user(&self, email: &str, name: &str) -> TestUser {
        let response = self.register(email, name, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = self.login(email, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        let token = body["token"].as_str().unwrap().to_string();
        let claims = verify_token(&token, JWT_SECRET).unwrap();

        TestUser {
            id: claims.id,
            email: claims.email,
            token,
        }
    }

    /// Creates a post as `user` and returns its id.
    pub async fn create_post(&self, user: &TestUser, content: &str) -> i64 {
        let response = self
            .post("/api/posts", Some(&user.token), json!({ "content": content }))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.unwrap();
        body["id"].as_i64().unwrap()
    }
}

pub async fn message(response: Response) -> String {
    let body: Value = response.json().await.expect("body is not json");
    body["message"]
        .as_str()
        .expect("body has no message")
        .to_string()
}

pub fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .expect("body is not a list")
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}
