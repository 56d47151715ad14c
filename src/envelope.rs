use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{INTERNAL_ERROR_MESSAGE, error_response};

/// The success half of every policy outcome: a status code and its payload.
///
/// Failures travel as [`crate::error::AppError`], which renders the matching
/// `{"error": ...}` body.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub status: StatusCode,
    pub data: T,
}

impl<T> Envelope<T> {
    /// A `200 OK` envelope.
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    /// A `201 Created` envelope.
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }
}

#[derive(Serialize)]
struct DataBody<'a, T> {
    data: &'a T,
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        match sonic_rs::to_string(&DataBody { data: &self.data }) {
            Ok(body) => (
                self.status,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Response serialization failed: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}
