use async_trait::async_trait;

use crate::{
    db::PgStore,
    error::Result,
    models::user::{NewUser, User, UserChanges},
};

/// Persistence capability for users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user and returns the stored record.
    async fn create(&self, user: NewUser) -> Result<User>;
    /// Finds a user by their ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    /// Finds a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Returns the first page of users ordered by ID.
    async fn list(&self, limit: i64) -> Result<Vec<User>>;
    /// Applies the supplied fields, leaving the rest untouched.
    async fn update(&self, id: i64, changes: UserChanges) -> Result<()>;
    /// Deletes a user together with their tokens and holiday plans.
    async fn delete(&self, id: i64) -> Result<()>;
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO users (name, email, password)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
                &[&user.name, &user.email, &user.password_hash],
            )
            .await?;
        Ok(User::try_from(&row)?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt("SELECT * FROM users WHERE id = $1", &[&id])
            .await?;
        Ok(row.as_ref().map(User::try_from).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt("SELECT * FROM users WHERE email = $1", &[&email])
            .await?;
        Ok(row.as_ref().map(User::try_from).transpose()?)
    }

    async fn list(&self, limit: i64) -> Result<Vec<User>> {
        let client = self.pool.get().await?;
        let rows = client
            .query("SELECT * FROM users ORDER BY id LIMIT $1", &[&limit])
            .await?;
        Ok(rows.iter().map(User::try_from).collect::<std::result::Result<_, _>>()?)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                r#"
                UPDATE users
                SET
                    name = COALESCE($2, name),
                    email = COALESCE($3, email),
                    password = COALESCE($4, password),
                    updated_at = NOW()
                WHERE id = $1
                "#,
                &[&id, &changes.name, &changes.email, &changes.password_hash],
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .execute("DELETE FROM users WHERE id = $1", &[&id])
            .await?;
        Ok(())
    }
}
