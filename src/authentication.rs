use std::sync::Arc;

use crate::{config::Config, errors::RequestError};
use anyhow::{Context, Result};
use argon2::PasswordVerifier;
use argon2::{password_hash::SaltString, Argon2, PasswordHash};
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const JWT_EXPIRY_DURATION: time::Duration = time::Duration::hours(1);

const NO_TOKEN: &str = "No token provided";
const BAD_FORMAT: &str = "Invalid token format";
const BAD_TOKEN: &str = "Unauthorized: Invalid or expired token";

/// Payload of the signed bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub exp: i64,
}

/// Identity of the caller on protected routes.
///
/// Taking `AuthUser` as a handler argument is what puts a route behind the
/// gate: the request is rejected with 401 before the handler runs unless it
/// carries `Authorization: Bearer <token>` with a valid, unexpired token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync + 'static,
{
    type Rejection = RequestError;
    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let config = match parts.extensions.get::<Arc<Config>>() {
            Some(config) => config.clone(),
            None => {
                tracing::error!("config extension missing from request");
                return Err(RequestError::ServerError);
            }
        };

        let header = match parts.headers.get(AUTHORIZATION) {
            Some(header) => header,
            None => return Err(RequestError::Unauthenticated(NO_TOKEN)),
        };
        let header = header
            .to_str()
            .map_err(|_| RequestError::Unauthenticated(BAD_FORMAT))?;
        let token = parse_bearer(header).ok_or(RequestError::Unauthenticated(BAD_FORMAT))?;

        let claims = verify_token(token, &config.jwt_secret)?;
        Ok(AuthUser {
            id: claims.id,
            email: claims.email,
        })
    }
}

fn parse_bearer(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

pub fn issue_token(id: i64, email: &str, secret: &str) -> Result<String> {
    let expiry_date = OffsetDateTime::now_utc() + JWT_EXPIRY_DURATION;
    let claims = Claims {
        id,
        email: email.to_owned(),
        exp: expiry_date.unix_timestamp(),
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_ref()),
    )
    .context("Failed to generate jwt token")
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, RequestError> {
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(secret.as_ref()),
        &jsonwebtoken::Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        RequestError::Unauthenticated(BAD_TOKEN)
    })?;
    let claims = token_data.claims;
    // decode() allows some leeway on exp
    if claims.exp < OffsetDateTime::now_utc().unix_timestamp() {
        return Err(RequestError::Unauthenticated(BAD_TOKEN));
    }
    Ok(claims)
}

pub async fn verify_password_argon2(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let hash = PasswordHash::new(hash.as_str())
            .map_err(|_| anyhow::anyhow!("Failed to verify password"))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok())
    })
    .await
    .context("Failed to verify password")?
}

pub async fn hash_password_argon2(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(rand::thread_rng());
        let hash = PasswordHash::generate(Argon2::default(), password, salt.as_salt())
            .map_err(|_| anyhow::anyhow!("Failed to hash password"))?;
        Ok(hash.to_string())
    })
    .await
    .context("Failed to hash password")?
}
