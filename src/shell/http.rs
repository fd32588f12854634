use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::modules::evaluations::use_cases::reconcile_evaluations::inbound::http as evaluations_http;
use crate::modules::reports::use_cases::export_report::inbound::http as export_http;
use crate::modules::students::use_cases::create_student::inbound::http as create_http;
use crate::modules::students::use_cases::delete_student::inbound::http as delete_http;
use crate::modules::students::use_cases::ensure_sections::inbound::http as sections_http;
use crate::modules::students::use_cases::repair_projections::inbound::http as repair_http;
use crate::modules::students::use_cases::update_student::inbound::http as update_http;
use crate::shared::core::primitives::Actor;
use crate::shell::state::AppState;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_NAME_HEADER: &str = "x-actor-name";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/students", post(create_http::handle))
        .route(
            "/students/{id}",
            put(update_http::handle).delete(delete_http::handle),
        )
        .route("/instructors/sections", post(sections_http::handle))
        .route("/evaluations/status", get(evaluations_http::status))
        .route("/evaluations/retry", post(evaluations_http::retry))
        .route("/projections/repair", post(repair_http::handle))
        .route("/reports/{kind}", get(export_http::handle))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Identity of the caller as forwarded by the authenticating proxy.
pub fn actor_from_headers(headers: &HeaderMap) -> Actor {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    let id = read(ACTOR_ID_HEADER).unwrap_or("anonymous");
    let name = read(ACTOR_NAME_HEADER).unwrap_or(id);
    Actor::new(id, name)
}

/// 500 carrying the error message. Logs the error once here.
pub fn internal_error(error: impl std::fmt::Display) -> Response {
    tracing::error!(%error, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": error.to_string() })),
    )
        .into_response()
}
