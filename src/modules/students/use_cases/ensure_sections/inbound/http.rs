use axum::{
    Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::modules::students::use_cases::ensure_sections::command::{
    EnsureSections, InstructorProfile,
};
use crate::modules::students::use_cases::errors::ApplicationError;
use crate::shared::core::primitives::now_millis;
use crate::shell::http::internal_error;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<InstructorProfile>, JsonRejection>,
) -> impl IntoResponse {
    let Json(profile) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = EnsureSections {
        profile,
        requested_at: now_millis(),
    };
    match state.ensure_sections.handle(command).await {
        Ok(claims) => (StatusCode::OK, Json(claims)).into_response(),
        Err(ApplicationError::Validation(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

#[cfg(test)]
mod ensure_sections_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::post,
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::shared::infrastructure::record_store::in_memory::InMemoryRecordStore;
    use crate::shell::state::AppState;

    use super::handle;

    #[tokio::test]
    async fn it_should_return_one_claim_per_section() {
        let state = AppState::for_tests(Arc::new(InMemoryRecordStore::new()));
        let app = Router::new()
            .route("/instructors/sections", post(handle))
            .with_state(state);
        let body = json!({
            "id": "instructor-1",
            "name": "Prof. Reyes",
            "college": "College of Computing",
            "sections": ["S1", "S2"],
        });
        let request = Request::builder()
            .method("POST")
            .uri("/instructors/sections")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let claims: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(claims[0]["sectionName"], "S1");
        assert_eq!(claims[1]["outcome"], "created");
    }
}
