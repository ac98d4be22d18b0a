use sqlx::SqlitePool;

use crate::{
    authentication::{hash_password_argon2, issue_token, verify_password_argon2},
    config::Config,
    data_formats::{LoginRequest, RegisterRequest},
    errors::RequestError,
    models::User,
};

use super::{get_user_by_email, require, violated_constraint, Constraint, USER_COLUMNS};

/// Maps a UNIQUE failure on `users` to the field the caller has to change.
pub(crate) fn user_conflict(message: &str) -> RequestError {
    if message.contains("users.phone") {
        RequestError::Conflict("User with this phone already exists")
    } else {
        RequestError::Conflict("User with this email already exists")
    }
}

pub async fn register_user_in_db(
    pool: &SqlitePool,
    RegisterRequest {
        email,
        phone,
        password,
        name,
    }: RegisterRequest,
) -> Result<User, RequestError> {
    require("email", &email)?;
    require("password", &password)?;
    require("name", &name)?;
    let phone = phone.filter(|phone| !phone.trim().is_empty());

    if get_user_by_email(pool, &email).await?.is_some() {
        return Err(RequestError::Conflict("User with this email already exists"));
    }

    let password = hash_password_argon2(password).await.map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        RequestError::ServerError
    })?;

    let query = format!(
        "INSERT INTO users (email, phone, password, name) VALUES (?, ?, ?, ?) RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&query)
        .bind(email)
        .bind(phone)
        .bind(password)
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some(Constraint::Unique(message)) => user_conflict(&message),
            _ => RequestError::from(e),
        })?;

    tracing::info!(user_id = user.id, "user registered");
    Ok(user)
}

/// Checks the credentials and issues a bearer token for the user.
pub async fn login_user_in_db(
    pool: &SqlitePool,
    config: &Config,
    LoginRequest { email, password }: LoginRequest,
) -> Result<String, RequestError> {
    require("email", &email)?;
    require("password", &password)?;

    // Unknown email and wrong password are indistinguishable to the caller.
    let user = match get_user_by_email(pool, &email).await? {
        Some(user) => user,
        None => {
            tracing::warn!("login attempt for unknown email");
            return Err(RequestError::InvalidCredentials);
        }
    };

    let is_password_correct = verify_password_argon2(password, user.password)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password verification failed");
            RequestError::ServerError
        })?;
    if !is_password_correct {
        tracing::warn!(user_id = user.id, "login attempt with wrong password");
        return Err(RequestError::InvalidCredentials);
    }

    let token = issue_token(user.id, &user.email, &config.jwt_secret).map_err(|e| {
        tracing::error!(error = %e, "token signing failed");
        RequestError::ServerError
    })?;
    tracing::info!(user_id = user.id, "user logged in");
    Ok(token)
}
