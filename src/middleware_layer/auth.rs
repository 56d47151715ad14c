use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    error::AppError,
    services::auth::{self as auth_service, INVALID_TOKEN},
    state::AppState,
};

/// Extracts the bearer token from the `Authorization` header.
///
/// # Arguments
///
/// * `request` - The incoming request.
///
/// # Returns
///
/// An `Option` containing the raw token if the header is present and well-formed.
fn extract_bearer_token(request: &Request<Body>) -> Option<&str> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// A middleware that requires a valid bearer token to be present.
///
/// On success the resolved [`crate::models::token::Caller`] is inserted into
/// the request extensions for handlers to pick up.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// The downstream `Response`, or a `401` envelope.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    tracing::debug!("🔐 Checking authentication...");

    let Some(token) = extract_bearer_token(&request) else {
        tracing::warn!("❌ No bearer token found");
        return AppError::Unauthorized(INVALID_TOKEN.to_string()).into_response();
    };

    let caller = match auth_service::authenticate_bearer(&state, token).await {
        Ok(caller) => caller,
        Err(e) => return e.into_response(),
    };

    tracing::debug!("✅ User authenticated: {}", caller.user_id);

    request.extensions_mut().insert(caller);

    next.run(request).await
}
