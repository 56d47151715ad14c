use crate::crypto::password;
use crate::envelope::Envelope;
use crate::error::{AppError, Result};
use crate::models::user::{NewUser, User, UserChanges};
use crate::state::AppState;

pub const USER_NOT_FOUND: &str = "User doesn't exists.";
pub const USER_FORBIDDEN: &str = "You don't have permission to update or delete this user.";
pub const USER_DELETED: &str = "User successfully deleted!";

/// Loads a user or fails with `NotFound`.
async fn find_existing(state: &AppState, user_id: i64) -> Result<User> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))
}

/// Users may only modify their own account.
fn ensure_self(user_id: i64, caller_id: i64) -> Result<()> {
    if user_id != caller_id {
        tracing::warn!("User {} attempted to modify user {}", caller_id, user_id);
        return Err(AppError::Forbidden(USER_FORBIDDEN.to_string()));
    }
    Ok(())
}

/// Creates a new user with a freshly hashed password.
pub async fn create(
    state: &AppState,
    name: String,
    email: String,
    password: String,
) -> Result<Envelope<User>> {
    let password_hash = password::hash_password(&password)?;
    let user = state
        .users
        .create(NewUser {
            name,
            email,
            password_hash,
        })
        .await?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok(Envelope::created(user))
}

/// Gets a user by ID.
pub async fn get(state: &AppState, user_id: i64) -> Result<Envelope<User>> {
    find_existing(state, user_id).await.map(Envelope::ok)
}

/// Lists the first page of users.
pub async fn list(state: &AppState) -> Result<Envelope<Vec<User>>> {
    let users = state.users.list(state.config.page_size).await?;
    Ok(Envelope::ok(users))
}

/// Updates the caller's own account with the supplied fields.
///
/// A new password is hashed before it reaches the store.
pub async fn update(
    state: &AppState,
    user_id: i64,
    caller_id: i64,
    name: Option<String>,
    email: Option<String>,
    new_password: Option<String>,
) -> Result<Envelope<User>> {
    find_existing(state, user_id).await?;
    ensure_self(user_id, caller_id)?;

    let password_hash = new_password
        .as_deref()
        .map(password::hash_password)
        .transpose()?;

    state
        .users
        .update(
            user_id,
            UserChanges {
                name,
                email,
                password_hash,
            },
        )
        .await?;

    tracing::info!("✅ User {} updated", user_id);
    find_existing(state, user_id).await.map(Envelope::ok)
}

/// Deletes the caller's own account, cascading to their tokens and plans.
pub async fn delete(state: &AppState, user_id: i64, caller_id: i64) -> Result<Envelope<&'static str>> {
    find_existing(state, user_id).await?;
    ensure_self(user_id, caller_id)?;

    state.users.delete(user_id).await?;

    tracing::info!("🗑️ User {} deleted", user_id);
    Ok(Envelope::ok(USER_DELETED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::http::StatusCode;

    async fn create_user(state: &AppState, email: &str) -> User {
        create(state, "Test User".to_string(), email.to_string(), "123456".to_string())
            .await
            .unwrap()
            .data
    }

    #[tokio::test]
    async fn create_hashes_the_password() {
        let state = AppState::in_memory(&Config::default());
        let envelope = create(
            &state,
            "Yuri Fernandes".to_string(),
            "y@x.com".to_string(),
            "123456".to_string(),
        )
        .await
        .unwrap();

        assert_eq!(envelope.status, StatusCode::CREATED);
        assert_ne!(envelope.data.password, "123456");
        assert!(password::verify_password("123456", &envelope.data.password).unwrap());
    }

    #[tokio::test]
    async fn get_missing_user_is_not_found() {
        let state = AppState::in_memory(&Config::default());
        let err = get(&state, 99).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), USER_NOT_FOUND);
    }

    #[tokio::test]
    async fn update_is_partial_and_limited_to_self() {
        let state = AppState::in_memory(&Config::default());
        let alice = create_user(&state, "alice@x.com").await;
        let bob = create_user(&state, "bob@x.com").await;

        let err = update(&state, alice.id, bob.id, Some("Mallory".to_string()), None, None)
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), USER_FORBIDDEN);

        let updated = update(&state, alice.id, alice.id, Some("Alice".to_string()), None, None)
            .await
            .unwrap()
            .data;
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.email, "alice@x.com");
        assert_eq!(updated.password, alice.password);
    }

    #[tokio::test]
    async fn update_rehashes_a_new_password() {
        let state = AppState::in_memory(&Config::default());
        let alice = create_user(&state, "alice@x.com").await;

        let updated = update(&state, alice.id, alice.id, None, None, Some("abcdef".to_string()))
            .await
            .unwrap()
            .data;
        assert!(password::verify_password("abcdef", &updated.password).unwrap());
    }

    #[tokio::test]
    async fn delete_is_limited_to_self_and_not_repeatable() {
        let state = AppState::in_memory(&Config::default());
        let alice = create_user(&state, "alice@x.com").await;
        let bob = create_user(&state, "bob@x.com").await;

        let err = delete(&state, alice.id, bob.id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let envelope = delete(&state, alice.id, alice.id).await.unwrap();
        assert_eq!(envelope.data, USER_DELETED);
        assert_eq!(
            delete(&state, alice.id, alice.id).await.unwrap_err().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn list_returns_one_page() {
        let config = Config {
            page_size: 2,
            ..Config::default()
        };
        let state = AppState::in_memory(&config);
        for i in 0..3 {
            create_user(&state, &format!("user{}@x.com", i)).await;
        }

        let page = list(&state).await.unwrap().data;
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].email, "user0@x.com");
    }
}
