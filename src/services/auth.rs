use crate::crypto::{password, token};
use crate::envelope::Envelope;
use crate::error::{AppError, Result};
use crate::models::token::Caller;
use crate::services::users::USER_NOT_FOUND;
use crate::state::AppState;

/// Returned when the password does not match the stored hash.
pub const INVALID_PASSWORD: &str = "Invalid password.";
/// Returned by the auth gate for missing, malformed, or revoked tokens.
pub const INVALID_TOKEN: &str = "Invalid token.";
/// Returned on logout.
pub const LOGGED_OUT: &str = "Successfully disconnected.";

/// Issues a bearer token for a user.
///
/// Every token the user already holds is deleted first, so earlier sessions
/// stop authenticating as soon as this succeeds.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `email` - The user's email address.
/// * `password` - The plaintext password.
///
/// # Returns
///
/// A `201 Created` envelope carrying the bearer string.
pub async fn issue_token(state: &AppState, email: &str, password: &str) -> Result<Envelope<String>> {
    tracing::debug!("🔐 Issuing token for: {}", email);

    let user = state
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

    if !password::verify_password(password, &user.password)? {
        return Err(AppError::InvalidCredential(INVALID_PASSWORD.to_string()));
    }

    let revoked = state.tokens.delete_for_user(user.id).await?;
    let secret = token::generate_secret();
    let record = state
        .tokens
        .create(user.id, email.to_string(), secret.digest)
        .await?;

    tracing::info!(
        "✅ Token {} issued for user {} ({} previous revoked)",
        record.id,
        user.id,
        revoked
    );

    Ok(Envelope::created(token::format_bearer(record.id, &secret.plaintext)))
}

/// Resolves a bearer string to the caller it authenticates.
///
/// # Returns
///
/// The `Caller`, or `Unauthorized` for any token that is malformed, unknown,
/// or does not match its stored digest.
pub async fn authenticate_bearer(state: &AppState, bearer: &str) -> Result<Caller> {
    let unauthorized = || AppError::Unauthorized(INVALID_TOKEN.to_string());

    let (token_id, secret) = token::parse_bearer(bearer).ok_or_else(unauthorized)?;
    let record = state
        .tokens
        .find_by_id(token_id)
        .await?
        .ok_or_else(unauthorized)?;

    if !token::digests_match(&record.token_hash, &token::digest(secret)) {
        return Err(unauthorized());
    }

    Ok(Caller {
        user_id: record.user_id,
        token_id: record.id,
    })
}

/// Revokes every token belonging to the caller, including the one presented.
pub async fn revoke_current_session(
    state: &AppState,
    caller: Caller,
) -> Result<Envelope<&'static str>> {
    let revoked = state.tokens.delete_for_user(caller.user_id).await?;
    tracing::info!(
        "👋 User {} logged out with token {} ({} tokens revoked)",
        caller.user_id,
        caller.token_id,
        revoked
    );
    Ok(Envelope::ok(LOGGED_OUT))
}
