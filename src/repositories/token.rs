use async_trait::async_trait;

use crate::{db::PgStore, error::Result, models::token::PersonalAccessToken};

/// Persistence capability for bearer tokens.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Stores a new token digest for a user.
    async fn create(&self, user_id: i64, name: String, token_hash: String)
    -> Result<PersonalAccessToken>;
    /// Finds a token by its ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<PersonalAccessToken>>;
    /// Deletes every token belonging to a user and returns how many were removed.
    async fn delete_for_user(&self, user_id: i64) -> Result<u64>;
}

#[async_trait]
impl TokenRepository for PgStore {
    async fn create(
        &self,
        user_id: i64,
        name: String,
        token_hash: String,
    ) -> Result<PersonalAccessToken> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO personal_access_tokens (user_id, name, token_hash)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
                &[&user_id, &name, &token_hash],
            )
            .await?;
        Ok(PersonalAccessToken::try_from(&row)?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PersonalAccessToken>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt("SELECT * FROM personal_access_tokens WHERE id = $1", &[&id])
            .await?;
        Ok(row.as_ref().map(PersonalAccessToken::try_from).transpose()?)
    }

    async fn delete_for_user(&self, user_id: i64) -> Result<u64> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute(
                "DELETE FROM personal_access_tokens WHERE user_id = $1",
                &[&user_id],
            )
            .await?;
        Ok(deleted)
    }
}
