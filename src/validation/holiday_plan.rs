use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// The only accepted date layout.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TITLE_TAKEN: &str = "title: The title has already been taken.";

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Parses a request date, reporting a bad layout as a field error.
pub fn validated_date(value: &str) -> Result<NaiveDate> {
    parse_date(value)
        .ok_or_else(|| AppError::Validation("date: does not match the format Y-m-d".to_string()))
}

/// Fails when another plan already uses `title`.
pub async fn ensure_title_available(
    state: &AppState,
    title: &str,
    except_plan_id: Option<i64>,
) -> Result<()> {
    match state.holiday_plans.find_by_title(title).await? {
        Some(existing) if Some(existing.id) != except_plan_id => {
            Err(AppError::Validation(TITLE_TAKEN.to_string()))
        }
        _ => Ok(()),
    }
}
