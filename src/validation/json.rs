use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use garde::{Report, Validate};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// A JSON body that has been deserialized and passed its `garde` rules.
///
/// Malformed bodies and rule violations are both reported as `422` with the
/// first failing field.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    T::Context: Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|report| AppError::Validation(first_error(&report)))?;

        Ok(Self(value))
    }
}

/// Renders the first violation as `<field>: <message>`.
pub fn first_error(report: &Report) -> String {
    report
        .iter()
        .next()
        .map(|(path, error)| format!("{}: {}", path, error))
        .unwrap_or_else(|| "The given data was invalid.".to_string())
}

/// A numeric `{id}` path segment.
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation("id: must be an integer".to_string()))?;
        Ok(Self(id))
    }
}
