use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use garde::Validate;
use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    error::Result,
    models::token::Caller,
    services::auth as auth_service,
    state::AppState,
    validation::json::ValidatedJson,
};

/// The request payload for issuing a token.
#[derive(Deserialize, Validate, Zeroize, ZeroizeOnDrop)]
pub struct TokenRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
}

/// Issues a bearer token for the supplied credentials.
#[axum::debug_handler]
pub async fn issue_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TokenRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Token request for: {}", payload.email);

    let envelope = auth_service::issue_token(&state, &payload.email, &payload.password).await?;

    Ok(envelope.into_response())
}

/// Revokes every token of the authenticated user.
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Response> {
    let envelope = auth_service::revoke_current_session(&state, caller).await?;
    Ok(envelope.into_response())
}
