//! Process-local store used when `STORAGE_BACKEND=memory` and by the test suite.
//!
//! All three record types live behind one lock so that deleting a user can
//! cascade to their tokens and plans the same way the Postgres foreign keys do.
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    error::Result,
    models::{
        holiday_plan::{HolidayPlan, HolidayPlanChanges, NewHolidayPlan},
        token::PersonalAccessToken,
        user::{NewUser, User, UserChanges},
    },
    repositories::{
        holiday_plan::HolidayPlanRepository, token::TokenRepository, user::UserRepository,
    },
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    tokens: BTreeMap<i64, PersonalAccessToken>,
    holiday_plans: BTreeMap<i64, HolidayPlan>,
    last_user_id: i64,
    last_token_id: i64,
    last_holiday_plan_id: i64,
}

/// In-memory implementation of every store trait.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let record = User {
            id: next_id(&mut tables.last_user_id),
            name: user.name,
            email: user.email,
            password: user.password_hash,
            email_verified_at: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list(&self, limit: i64) -> Result<Vec<User>> {
        let take = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .take(take)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.get_mut(&id) {
            if let Some(name) = changes.name {
                user.name = name;
            }
            if let Some(email) = changes.email {
                user.email = email;
            }
            if let Some(password_hash) = changes.password_hash {
                user.password = password_hash;
            }
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id);
        tables.tokens.retain(|_, token| token.user_id != id);
        tables.holiday_plans.retain(|_, plan| plan.owner_id != id);
        Ok(())
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn create(
        &self,
        user_id: i64,
        name: String,
        token_hash: String,
    ) -> Result<PersonalAccessToken> {
        let mut tables = self.tables.write().await;
        let record = PersonalAccessToken {
            id: next_id(&mut tables.last_token_id),
            user_id,
            name,
            token_hash,
            created_at: Utc::now(),
        };
        tables.tokens.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PersonalAccessToken>> {
        Ok(self.tables.read().await.tokens.get(&id).cloned())
    }

    async fn delete_for_user(&self, user_id: i64) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.tokens.len();
        tables.tokens.retain(|_, token| token.user_id != user_id);
        Ok((before - tables.tokens.len()) as u64)
    }
}

#[async_trait]
impl HolidayPlanRepository for MemoryStore {
    async fn create(&self, owner_id: i64, plan: NewHolidayPlan) -> Result<HolidayPlan> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let record = HolidayPlan {
            id: next_id(&mut tables.last_holiday_plan_id),
            owner_id,
            title: plan.title,
            description: plan.description,
            date: plan.date,
            location: plan.location,
            participants: plan.participants,
            created_at: now,
            updated_at: now,
        };
        tables.holiday_plans.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<HolidayPlan>> {
        Ok(self.tables.read().await.holiday_plans.get(&id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<HolidayPlan>> {
        Ok(self
            .tables
            .read()
            .await
            .holiday_plans
            .values()
            .find(|plan| plan.title == title)
            .cloned())
    }

    async fn list(&self, limit: i64) -> Result<Vec<HolidayPlan>> {
        let take = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .tables
            .read()
            .await
            .holiday_plans
            .values()
            .take(take)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, changes: HolidayPlanChanges) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(plan) = tables.holiday_plans.get_mut(&id) {
            if let Some(title) = changes.title {
                plan.title = title;
            }
            if let Some(description) = changes.description {
                plan.description = description;
            }
            if let Some(date) = changes.date {
                plan.date = date;
            }
            if let Some(location) = changes.location {
                plan.location = location;
            }
            if let Some(participants) = changes.participants {
                plan.participants = Some(participants);
            }
            plan.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.tables.write().await.holiday_plans.remove(&id);
        Ok(())
    }
}
