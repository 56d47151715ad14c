//! Holiday plan lifecycle policy.
//!
//! Every operation follows the same shape: load the plan, fail with
//! `NotFound` if it is absent, check ownership where the operation mutates,
//! then check title uniqueness and act. Reads and exports are open to any authenticated caller; only
//! updates and deletes are restricted to the owner.
use crate::envelope::Envelope;
use crate::error::{AppError, Result};
use crate::models::holiday_plan::{HolidayPlan, HolidayPlanChanges, NewHolidayPlan};
use crate::pdf::{self, RenderedPdf};
use crate::state::AppState;
use crate::validation::holiday_plan::ensure_title_available;

pub const HOLIDAY_PLAN_NOT_FOUND: &str = "Holiday plan doesn't exists.";
pub const HOLIDAY_PLAN_FORBIDDEN: &str = "You don't have permission to perform this action.";
pub const HOLIDAY_PLAN_DELETED: &str = "Holiday plan successfully deleted!";

async fn find_existing(state: &AppState, plan_id: i64) -> Result<HolidayPlan> {
    state
        .holiday_plans
        .find_by_id(plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound(HOLIDAY_PLAN_NOT_FOUND.to_string()))
}

fn ensure_owner(plan: &HolidayPlan, caller_id: i64) -> Result<()> {
    if plan.owner_id != caller_id {
        tracing::warn!(
            "User {} is not the owner of holiday plan {} (owner {})",
            caller_id,
            plan.id,
            plan.owner_id
        );
        return Err(AppError::Forbidden(HOLIDAY_PLAN_FORBIDDEN.to_string()));
    }
    Ok(())
}

/// Creates a plan owned by `owner_id`.
pub async fn create(
    state: &AppState,
    owner_id: i64,
    plan: NewHolidayPlan,
) -> Result<Envelope<HolidayPlan>> {
    ensure_title_available(state, &plan.title, None).await?;

    let plan = state.holiday_plans.create(owner_id, plan).await?;
    tracing::info!("✅ Holiday plan {} created by user {}", plan.id, owner_id);
    Ok(Envelope::created(plan))
}

/// Gets a plan by ID.
pub async fn get(state: &AppState, plan_id: i64) -> Result<Envelope<HolidayPlan>> {
    find_existing(state, plan_id).await.map(Envelope::ok)
}

/// Lists the first page of plans across all owners.
pub async fn list(state: &AppState) -> Result<Envelope<Vec<HolidayPlan>>> {
    let plans = state.holiday_plans.list(state.config.page_size).await?;
    Ok(Envelope::ok(plans))
}

/// Applies a partial update on behalf of the plan's owner and returns the
/// reloaded record.
pub async fn update(
    state: &AppState,
    plan_id: i64,
    caller_id: i64,
    changes: HolidayPlanChanges,
) -> Result<Envelope<HolidayPlan>> {
    let plan = find_existing(state, plan_id).await?;
    ensure_owner(&plan, caller_id)?;

    if let Some(title) = changes.title.as_deref() {
        ensure_title_available(state, title, Some(plan_id)).await?;
    }

    state.holiday_plans.update(plan_id, changes).await?;

    tracing::info!("✅ Holiday plan {} updated", plan_id);
    find_existing(state, plan_id).await.map(Envelope::ok)
}

/// Deletes a plan on behalf of its owner.
pub async fn delete(
    state: &AppState,
    plan_id: i64,
    caller_id: i64,
) -> Result<Envelope<&'static str>> {
    let plan = find_existing(state, plan_id).await?;
    ensure_owner(&plan, caller_id)?;

    state.holiday_plans.delete(plan_id).await?;

    tracing::info!("🗑️ Holiday plan {} deleted", plan_id);
    Ok(Envelope::ok(HOLIDAY_PLAN_DELETED))
}

/// Renders a plan and its owner's name as a PDF.
pub async fn export_pdf(state: &AppState, plan_id: i64) -> Result<RenderedPdf> {
    let plan = find_existing(state, plan_id).await?;
    let owner = state
        .users
        .find_by_id(plan.owner_id)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!(
                "Owner {} of holiday plan {} is missing",
                plan.owner_id, plan.id
            ))
        })?;

    pdf::render_holiday_plan(&plan, &owner.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::user::NewUser;
    use crate::validation::holiday_plan::TITLE_TAKEN;
    use axum::http::StatusCode;
    use chrono::NaiveDate;

    async fn user(state: &AppState, name: &str) -> i64 {
        state
            .users
            .create(NewUser {
                name: name.to_string(),
                email: format!("{}@x.com", name.to_lowercase()),
                password_hash: "unused".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn new_plan(title: &str) -> NewHolidayPlan {
        NewHolidayPlan {
            title: title.to_string(),
            description: "Sun and pastéis de nata".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            location: "Lisbon".to_string(),
            participants: Some(3),
        }
    }

    async fn setup() -> (AppState, i64, i64) {
        let state = AppState::in_memory(&Config::default());
        let owner = user(&state, "Owner").await;
        let other = user(&state, "Other").await;
        (state, owner, other)
    }

    #[tokio::test]
    async fn create_binds_the_caller_as_owner() {
        let (state, owner, _) = setup().await;

        let envelope = create(&state, owner, new_plan("Travel to Lisbon")).await.unwrap();
        assert_eq!(envelope.status, StatusCode::CREATED);
        assert_eq!(envelope.data.owner_id, owner);
        assert!(envelope.data.id > 0);
    }

    #[tokio::test]
    async fn get_is_open_to_any_caller() {
        let (state, owner, _) = setup().await;
        let plan = create(&state, owner, new_plan("Travel")).await.unwrap().data;

        let envelope = get(&state, plan.id).await.unwrap();
        assert_eq!(envelope.status, StatusCode::OK);
        assert_eq!(envelope.data, plan);
    }

    #[tokio::test]
    async fn missing_plan_is_not_found_for_every_operation() {
        let (state, owner, _) = setup().await;

        for err in [
            get(&state, 123).await.unwrap_err(),
            update(&state, 123, owner, HolidayPlanChanges::default())
                .await
                .unwrap_err(),
            delete(&state, 123, owner).await.unwrap_err(),
            export_pdf(&state, 123).await.unwrap_err(),
        ] {
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
            assert_eq!(err.public_message(), HOLIDAY_PLAN_NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn non_owner_cannot_update_or_delete() {
        let (state, owner, other) = setup().await;
        let plan = create(&state, owner, new_plan("Travel")).await.unwrap().data;

        let changes = HolidayPlanChanges {
            title: Some("Hijacked".to_string()),
            ..Default::default()
        };
        let err = update(&state, plan.id, other, changes).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.public_message(), HOLIDAY_PLAN_FORBIDDEN);

        let err = delete(&state, plan.id, other).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        assert_eq!(get(&state, plan.id).await.unwrap().data.title, "Travel");
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let (state, owner, _) = setup().await;
        let plan = create(&state, owner, new_plan("Travel")).await.unwrap().data;

        let changes = HolidayPlanChanges {
            title: Some("New Travel".to_string()),
            ..Default::default()
        };
        let updated = update(&state, plan.id, owner, changes).await.unwrap();
        assert_eq!(updated.status, StatusCode::OK);
        assert_eq!(updated.data.title, "New Travel");
        assert_eq!(updated.data.description, plan.description);
        assert_eq!(updated.data.date, plan.date);
        assert_eq!(updated.data.location, plan.location);
        assert_eq!(updated.data.participants, plan.participants);
        assert_eq!(updated.data.owner_id, owner);

        let reloaded = get(&state, plan.id).await.unwrap().data;
        assert_eq!(reloaded, updated.data);
    }

    #[tokio::test]
    async fn titles_stay_unique() {
        let (state, owner, _) = setup().await;
        let plan = create(&state, owner, new_plan("Travel")).await.unwrap().data;
        create(&state, owner, new_plan("Taken")).await.unwrap();

        let err = create(&state, owner, new_plan("Taken")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.public_message(), TITLE_TAKEN);

        let rename = |title: &str| HolidayPlanChanges {
            title: Some(title.to_string()),
            ..Default::default()
        };
        let err = update(&state, plan.id, owner, rename("Taken")).await.unwrap_err();
        assert_eq!(err.public_message(), TITLE_TAKEN);

        // Keeping its own title is not a conflict.
        let kept = update(&state, plan.id, owner, rename("Travel")).await.unwrap();
        assert_eq!(kept.data.title, "Travel");
    }

    #[tokio::test]
    async fn existence_and_ownership_are_checked_before_title() {
        let (state, owner, other) = setup().await;
        let plan = create(&state, owner, new_plan("Travel")).await.unwrap().data;
        create(&state, owner, new_plan("Taken")).await.unwrap();

        let rename = || HolidayPlanChanges {
            title: Some("Taken".to_string()),
            ..Default::default()
        };
        let err = update(&state, 999, other, rename()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = update(&state, plan.id, other, rename()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.public_message(), HOLIDAY_PLAN_FORBIDDEN);
    }

    #[tokio::test]
    async fn delete_succeeds_once() {
        let (state, owner, _) = setup().await;
        let plan = create(&state, owner, new_plan("Travel")).await.unwrap().data;

        let envelope = delete(&state, plan.id, owner).await.unwrap();
        assert_eq!(envelope.status, StatusCode::OK);
        assert_eq!(envelope.data, HOLIDAY_PLAN_DELETED);

        let err = delete(&state, plan.id, owner).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_spans_owners_and_stops_at_one_page() {
        let (state, owner, other) = setup().await;
        for i in 0..12 {
            let who = if i % 2 == 0 { owner } else { other };
            create(&state, who, new_plan(&format!("Plan {}", i))).await.unwrap();
        }

        let page = list(&state).await.unwrap().data;
        assert_eq!(page.len(), 10);
        assert!(page.iter().any(|plan| plan.owner_id == owner));
        assert!(page.iter().any(|plan| plan.owner_id == other));
        assert_eq!(page[0].title, "Plan 0");
    }

    #[tokio::test]
    async fn export_is_open_to_any_caller() {
        let (state, owner, _) = setup().await;
        let plan = create(&state, owner, new_plan("Travel")).await.unwrap().data;

        let rendered = export_pdf(&state, plan.id).await.unwrap();
        assert!(rendered.bytes.starts_with(b"%PDF"));
    }
}
