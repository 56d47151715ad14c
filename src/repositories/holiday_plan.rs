use async_trait::async_trait;

use crate::{
    db::PgStore,
    error::Result,
    models::holiday_plan::{HolidayPlan, HolidayPlanChanges, NewHolidayPlan},
};

/// Persistence capability for holiday plans.
#[async_trait]
pub trait HolidayPlanRepository: Send + Sync {
    /// Inserts a plan owned by `owner_id`.
    async fn create(&self, owner_id: i64, plan: NewHolidayPlan) -> Result<HolidayPlan>;
    /// Finds a plan by its ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<HolidayPlan>>;
    /// Finds a plan by its title.
    async fn find_by_title(&self, title: &str) -> Result<Option<HolidayPlan>>;
    /// Returns the first page of plans ordered by ID, across all owners.
    async fn list(&self, limit: i64) -> Result<Vec<HolidayPlan>>;
    /// Applies the supplied fields, leaving the rest untouched.
    async fn update(&self, id: i64, changes: HolidayPlanChanges) -> Result<()>;
    /// Deletes a plan.
    async fn delete(&self, id: i64) -> Result<()>;
}

#[async_trait]
impl HolidayPlanRepository for PgStore {
    async fn create(&self, owner_id: i64, plan: NewHolidayPlan) -> Result<HolidayPlan> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO holiday_plans (owner_id, title, description, date, location, participants)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
                &[
                    &owner_id,
                    &plan.title,
                    &plan.description,
                    &plan.date,
                    &plan.location,
                    &plan.participants,
                ],
            )
            .await?;
        Ok(HolidayPlan::try_from(&row)?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<HolidayPlan>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt("SELECT * FROM holiday_plans WHERE id = $1", &[&id])
            .await?;
        Ok(row.as_ref().map(HolidayPlan::try_from).transpose()?)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<HolidayPlan>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt("SELECT * FROM holiday_plans WHERE title = $1", &[&title])
            .await?;
        Ok(row.as_ref().map(HolidayPlan::try_from).transpose()?)
    }

    async fn list(&self, limit: i64) -> Result<Vec<HolidayPlan>> {
        let client = self.pool.get().await?;
        let rows = client
            .query("SELECT * FROM holiday_plans ORDER BY id LIMIT $1", &[&limit])
            .await?;
        Ok(rows
            .iter()
            .map(HolidayPlan::try_from)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn update(&self, id: i64, changes: HolidayPlanChanges) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                r#"
                UPDATE holiday_plans
                SET
                    title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    date = COALESCE($4, date),
                    location = COALESCE($5, location),
                    participants = COALESCE($6, participants),
                    updated_at = NOW()
                WHERE id = $1
                "#,
                &[
                    &id,
                    &changes.title,
                    &changes.description,
                    &changes.date,
                    &changes.location,
                    &changes.participants,
                ],
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .execute("DELETE FROM holiday_plans WHERE id = $1", &[&id])
            .await?;
        Ok(())
    }
}
