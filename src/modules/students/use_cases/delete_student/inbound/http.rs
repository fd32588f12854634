use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use crate::modules::students::use_cases::delete_student::command::DeleteStudent;
use crate::modules::students::use_cases::errors::ApplicationError;
use crate::shared::core::primitives::now_millis;
use crate::shell::http::{actor_from_headers, internal_error};
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let command = DeleteStudent {
        student_id,
        actor: actor_from_headers(&headers),
        deleted_at: now_millis(),
    };

    match state.delete_student.handle(command).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(ApplicationError::NotFound { .. }) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => internal_error(e),
    }
}
