use axum::{
    Json,
    extract::State,
    extract::rejection::JsonRejection,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::modules::students::core::student::StudentData;
use crate::modules::students::use_cases::create_student::command::CreateStudent;
use crate::modules::students::use_cases::errors::ApplicationError;
use crate::shared::core::primitives::now_millis;
use crate::shell::http::{actor_from_headers, internal_error};
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<StudentData>, JsonRejection>,
) -> impl IntoResponse {
    let Json(data) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = CreateStudent {
        student_id: Uuid::now_v7().to_string(),
        data,
        actor: actor_from_headers(&headers),
        created_at: now_millis(),
    };

    match state.create_student.handle(command).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(ApplicationError::Validation(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}
