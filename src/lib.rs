mod authentication;
mod config;
mod data_formats;
mod db_helpers;
mod errors;
mod handlers;
mod models;

use std::{str::FromStr, sync::Arc};

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
use handlers::*;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Sqlite, SqlitePool,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use authentication::{issue_token, verify_token, AuthUser, Claims};
pub use config::Config;
pub use data_formats::*;
pub use errors::RequestError;

pub type JsonResponse<T> = (StatusCode, Json<T>);

const DEFAULT_LOG_FILTER: &str = "info,tower_http=info,sqlx=warn";

pub fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

pub async fn run_app(config: Config) -> Result<()> {
    let address = config.socket_addr()?;
    let db = init_db(&config).await?;
    let app = build_app(db, config);
    tracing::info!(%address, "server started");
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
}

/// Creates the database if needed, opens the pool and runs the migrations.
pub async fn init_db(config: &Config) -> Result<SqlitePool> {
    let db_url = config.database_url.as_str();
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!(db_url, "creating database");
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("Failed to create database {db_url}"))?;
    }

    let options = SqliteConnectOptions::from_str(db_url)
        .with_context(|| format!("Invalid DATABASE_URL {db_url}"))?
        .foreign_keys(true);
    // No idle reaping, so an in-memory database lives as long as the pool.
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("migrations completed");
    Ok(pool)
}

/// The routing table wrapped with the shared pool, config and HTTP layers.
pub fn build_app(db: SqlitePool, config: Config) -> Router {
    make_router()
        .layer(Extension(db))
        .layer(Extension(Arc::new(config)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// Handlers taking an `AuthUser` are the authenticated routes.
pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/api/auth/register", post(register_user))
        .route("/api/auth/login", post(login_user))
        .route("/api/users/me", put(update_profile))
        .route("/api/users/:id", get(get_profile))
        .route("/api/users/:id/follow", post(follow_user))
        .route("/api/users/:id/unfollow", post(unfollow_user))
        .route("/api/posts", post(create_post))
        .route("/api/posts/feed", get(get_feed))
        .route("/api/posts/user/:user_id", get(get_user_posts))
        .route("/api/posts/:id", get(get_post))
        .route("/api/posts/:id/reply", post(reply_to_post))
        .route("/api/search/users", get(search_users))
        .route("/api/search/posts", get(search_posts))
        .route("/api/search/hashtags", get(search_hashtags))
        .route("/api/likes/:id/like", post(like_post))
        .route("/api/likes/:id/unlike", post(unlike_post))
        .route("/api/likes/:id/count", get(count_likes))
        .fallback(not_found)
}
