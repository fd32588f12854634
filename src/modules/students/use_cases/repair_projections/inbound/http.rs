use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use crate::shared::core::primitives::now_millis;
use crate::shell::http::{actor_from_headers, internal_error};
use crate::shell::state::AppState;

pub async fn handle(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let actor = actor_from_headers(&headers);
    match state.repair_projections.handle(&actor, now_millis()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => internal_error(e),
    }
}
