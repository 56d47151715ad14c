use chrono::{DateTime, Utc};
use tokio_postgres::Row;

/// A stored bearer token. Only the SHA-256 digest of the secret is kept.
#[derive(Debug, Clone)]
pub struct PersonalAccessToken {
    /// The token identifier, also the prefix of the bearer string.
    pub id: i64,
    /// The ID of the user this token authenticates.
    pub user_id: i64,
    /// A label for the token; the email it was issued for.
    pub name: String,
    /// Hex SHA-256 digest of the secret.
    pub token_hash: String,
    /// The timestamp when the token was issued.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Row> for PersonalAccessToken {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            token_hash: row.try_get("token_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// The identity resolved from a bearer token by the auth gate.
///
/// Inserted into request extensions and threaded explicitly into every
/// policy call that needs to know who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    pub token_id: i64,
}
