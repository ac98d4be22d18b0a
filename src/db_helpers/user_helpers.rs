use sqlx::SqlitePool;

use crate::{
    authentication::hash_password_argon2,
    data_formats::UpdateProfileRequest,
    errors::RequestError,
    models::User,
};

use super::{
    auth_helpers::user_conflict, get_user_by_id, require, violated_constraint, Constraint,
    QueryBuilder, USER_COLUMNS,
};

/// Applies the fields present in the request to the caller's own record.
pub async fn update_user_in_db(
    pool: &SqlitePool,
    id: i64,
    UpdateProfileRequest {
        name,
        bio,
        avatar,
        phone,
        email,
        password,
    }: UpdateProfileRequest,
) -> Result<User, RequestError> {
    // Same rules as registration: these may be omitted but never blanked.
    for (field, value) in [("name", &name), ("email", &email), ("password", &password)] {
        if let Some(value) = value {
            require(field, value)?;
        }
    }
    // A blank phone clears it, so it never collides on the UNIQUE index.
    let phone = phone.map(|phone| Some(phone).filter(|phone| !phone.trim().is_empty()));

    let password = match password {
        Some(password) => Some(hash_password_argon2(password).await.map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            RequestError::ServerError
        })?),
        None => None,
    };

    let builder = QueryBuilder::new("UPDATE users SET ", ", ")
        .add_param("name", name)
        .add_param("bio", bio)
        .add_param("avatar", avatar)
        .add_nullable_param("phone", phone)
        .add_param("email", email)
        .add_param("password", password);

    if builder.is_empty() {
        return get_user_by_id(pool, id)
            .await?
            .ok_or(RequestError::NotFound("User not found"));
    }

    let (mut query, params) = builder.build();
    query.push_str(&format!(" WHERE id = ? RETURNING {USER_COLUMNS}"));

    let mut update = sqlx::query_as::<_, User>(&query);
    for param in params {
        update = update.bind(param);
    }
    let user = update
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some(Constraint::Unique(message)) => user_conflict(&message),
            _ => RequestError::from(e),
        })?;

    match user {
        Some(user) => Ok(user),
        None => Err(RequestError::NotFound("User not found")),
    }
}
