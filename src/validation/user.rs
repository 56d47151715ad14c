use crate::error::{AppError, Result};
use crate::state::AppState;

pub const EMAIL_TAKEN: &str = "email: The email has already been taken.";

/// Fails when another user already holds `email`.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `email` - The address to check.
/// * `except_user_id` - A user allowed to keep the address (the one being updated).
///
/// # Returns
///
/// A `Result<()>` indicating whether the address is free.
pub async fn ensure_email_available(
    state: &AppState,
    email: &str,
    except_user_id: Option<i64>,
) -> Result<()> {
    match state.users.find_by_email(email).await? {
        Some(existing) if Some(existing.id) != except_user_id => {
            Err(AppError::Validation(EMAIL_TAKEN.to_string()))
        }
        _ => Ok(()),
    }
}
