use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use garde::Validate;
use serde::Deserialize;

use crate::{
    error::Result,
    models::token::Caller,
    services::users as user_service,
    state::AppState,
    validation::{
        json::{IdPath, ValidatedJson},
        user::ensure_email_available,
    },
};

/// The request payload for user registration.
#[derive(Deserialize, Validate)]
pub struct CreateUserRequest {
    #[garde(length(chars, min = 1, max = 255))]
    pub name: String,
    #[garde(email, length(max = 255))]
    pub email: String,
    #[garde(length(chars, min = 6, max = 255))]
    pub password: String,
}

/// The request payload for a partial user update.
#[derive(Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[garde(length(chars, min = 1, max = 255))]
    pub name: Option<String>,
    #[garde(email, length(max = 255))]
    pub email: Option<String>,
    #[garde(length(chars, min = 6, max = 255))]
    pub password: Option<String>,
}

/// Registers a new user.
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<Response> {
    ensure_email_available(&state, &req.email, None).await?;

    let envelope = user_service::create(&state, req.name, req.email, req.password).await?;
    Ok(envelope.into_response())
}

/// Lists the first page of users.
#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> Result<Response> {
    Ok(user_service::list(&state).await?.into_response())
}

/// Gets a single user.
#[axum::debug_handler]
pub async fn get_user(State(state): State<AppState>, IdPath(user_id): IdPath) -> Result<Response> {
    Ok(user_service::get(&state, user_id).await?.into_response())
}

/// Updates the caller's own account.
#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    IdPath(user_id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Response> {
    if let Some(email) = req.email.as_deref() {
        ensure_email_available(&state, email, Some(user_id)).await?;
    }

    let envelope = user_service::update(
        &state,
        user_id,
        caller.user_id,
        req.name,
        req.email,
        req.password,
    )
    .await?;

    Ok(envelope.into_response())
}

/// Deletes the caller's own account.
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    IdPath(user_id): IdPath,
) -> Result<Response> {
    Ok(user_service::delete(&state, user_id, caller.user_id)
        .await?
        .into_response())
}
