use axum::{
    Extension,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use garde::Validate;
use serde::Deserialize;

use crate::{
    error::Result,
    models::{
        holiday_plan::{HolidayPlanChanges, NewHolidayPlan},
        token::Caller,
    },
    services::holiday_plans as holiday_plan_service,
    state::AppState,
    validation::{
        holiday_plan::validated_date,
        json::{IdPath, ValidatedJson},
    },
};

/// The request payload for creating a holiday plan.
///
/// There is deliberately no owner field; the owner is always the caller.
#[derive(Deserialize, Validate)]
pub struct CreateHolidayPlanRequest {
    #[garde(length(chars, min = 1, max = 50))]
    pub title: String,
    #[garde(length(chars, min = 1, max = 150))]
    pub description: String,
    // Parsed when converted into a new plan.
    #[garde(skip)]
    pub date: String,
    #[garde(length(chars, min = 1, max = 20))]
    pub location: String,
    #[garde(range(min = 0, max = 50))]
    pub participants: Option<i32>,
}

impl CreateHolidayPlanRequest {
    fn into_new_plan(self) -> Result<NewHolidayPlan> {
        Ok(NewHolidayPlan {
            date: validated_date(&self.date)?,
            title: self.title,
            description: self.description,
            location: self.location,
            participants: self.participants,
        })
    }
}

/// The request payload for a partial holiday plan update.
#[derive(Deserialize, Validate)]
pub struct UpdateHolidayPlanRequest {
    #[garde(length(chars, min = 1, max = 50))]
    pub title: Option<String>,
    #[garde(length(chars, min = 1, max = 150))]
    pub description: Option<String>,
    // Parsed when converted into changes.
    #[garde(skip)]
    pub date: Option<String>,
    #[garde(length(chars, min = 1, max = 20))]
    pub location: Option<String>,
    #[garde(range(min = 0, max = 50))]
    pub participants: Option<i32>,
}

impl UpdateHolidayPlanRequest {
    fn into_changes(self) -> Result<HolidayPlanChanges> {
        Ok(HolidayPlanChanges {
            date: self.date.as_deref().map(validated_date).transpose()?,
            title: self.title,
            description: self.description,
            location: self.location,
            participants: self.participants,
        })
    }
}

/// Creates a holiday plan owned by the caller.
#[axum::debug_handler]
pub async fn create_holiday_plan(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(req): ValidatedJson<CreateHolidayPlanRequest>,
) -> Result<Response> {
    let envelope =
        holiday_plan_service::create(&state, caller.user_id, req.into_new_plan()?).await?;
    Ok(envelope.into_response())
}

/// Lists the first page of holiday plans.
#[axum::debug_handler]
pub async fn list_holiday_plans(State(state): State<AppState>) -> Result<Response> {
    Ok(holiday_plan_service::list(&state).await?.into_response())
}

/// Gets a single holiday plan.
#[axum::debug_handler]
pub async fn get_holiday_plan(
    State(state): State<AppState>,
    IdPath(plan_id): IdPath,
) -> Result<Response> {
    Ok(holiday_plan_service::get(&state, plan_id)
        .await?
        .into_response())
}

/// Updates a holiday plan owned by the caller.
#[axum::debug_handler]
pub async fn update_holiday_plan(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    IdPath(plan_id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateHolidayPlanRequest>,
) -> Result<Response> {
    let envelope =
        holiday_plan_service::update(&state, plan_id, caller.user_id, req.into_changes()?)
            .await?;
    Ok(envelope.into_response())
}

/// Deletes a holiday plan owned by the caller.
#[axum::debug_handler]
pub async fn delete_holiday_plan(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    IdPath(plan_id): IdPath,
) -> Result<Response> {
    Ok(holiday_plan_service::delete(&state, plan_id, caller.user_id)
        .await?
        .into_response())
}

/// Downloads a holiday plan as a PDF.
#[axum::debug_handler]
pub async fn export_holiday_plan_pdf(
    State(state): State<AppState>,
    IdPath(plan_id): IdPath,
) -> Result<Response> {
    let rendered = holiday_plan_service::export_pdf(&state, plan_id).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", rendered.filename),
            ),
        ],
        rendered.bytes,
    )
        .into_response())
}
