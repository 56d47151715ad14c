use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// A holiday plan owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HolidayPlan {
    /// The unique identifier for the plan.
    pub id: i64,
    /// The ID of the user who owns the plan. Fixed at creation.
    pub owner_id: i64,
    /// The plan title. Unique across plans.
    pub title: String,
    /// A free-form description.
    pub description: String,
    /// The day the holiday takes place.
    pub date: NaiveDate,
    /// Where the holiday takes place.
    pub location: String,
    /// The expected number of participants.
    pub participants: Option<i32>,
    /// The timestamp when the plan was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the plan was last updated.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Row> for HolidayPlan {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            date: row.try_get("date")?,
            location: row.try_get("location")?,
            participants: row.try_get("participants")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// The caller-controlled fields of a new plan. The owner is bound separately.
#[derive(Debug, Clone)]
pub struct NewHolidayPlan {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
    pub participants: Option<i32>,
}

/// A partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct HolidayPlanChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub participants: Option<i32>,
}
