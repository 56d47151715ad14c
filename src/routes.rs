use std::any::Any;

use axum::{
    Router,
    middleware::from_fn_with_state,
    response::Response,
    routing::{get, post},
};
use http::{HeaderValue, Method, StatusCode, header};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    error::{AppError, INTERNAL_ERROR_MESSAGE, error_response},
    handlers, middleware_layer,
    state::AppState,
};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️ Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("❌ Handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found.".to_string())
}

/// Builds the full application router.
///
/// Every route is served both at the root and under `/api`.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/users", post(handlers::users::create_user))
        .route("/token", post(handlers::auth::issue_token));

    let protected_routes = Router::new()
        .route("/users", get(handlers::users::list_users))
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .patch(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route(
            "/holiday-plans",
            get(handlers::holiday_plans::list_holiday_plans)
                .post(handlers::holiday_plans::create_holiday_plan),
        )
        .route(
            "/holiday-plans/{id}",
            get(handlers::holiday_plans::get_holiday_plan)
                .put(handlers::holiday_plans::update_holiday_plan)
                .patch(handlers::holiday_plans::update_holiday_plan)
                .delete(handlers::holiday_plans::delete_holiday_plan),
        )
        .route(
            "/holiday-plans/{id}/pdf",
            get(handlers::holiday_plans::export_holiday_plan_pdf),
        )
        .route("/logout", post(handlers::auth::logout))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ));

    let api: Router<AppState> = Router::new().merge(public_routes).merge(protected_routes);

    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .fallback(route_not_found)
        .with_state(state.clone())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::INFO))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(cors_layer(&state.config.cors_origins))
}
