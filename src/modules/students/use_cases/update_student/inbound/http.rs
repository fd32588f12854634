use axum::{
    Json,
    extract::rejection::JsonRejection,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::json;

use crate::modules::students::core::student::StudentData;
use crate::modules::students::use_cases::errors::ApplicationError;
use crate::modules::students::use_cases::update_student::command::UpdateStudent;
use crate::shared::core::primitives::now_millis;
use crate::shell::http::{actor_from_headers, internal_error};
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<StudentData>, JsonRejection>,
) -> impl IntoResponse {
    let Json(data) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = UpdateStudent {
        student_id,
        data,
        actor: actor_from_headers(&headers),
        updated_at: now_millis(),
    };

    match state.update_student.handle(command).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(ApplicationError::NotFound { .. }) => StatusCode::NOT_FOUND.into_response(),
        Err(ApplicationError::Validation(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}
