use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::modules::evaluations::core::reduce::ReconcilerAction;
use crate::modules::evaluations::core::state::StudentEvaluationStatus;
use crate::shell::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationStatusResponse {
    pub loading: bool,
    pub error: Option<String>,
    pub statuses: Vec<StudentEvaluationStatus>,
}

pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.evaluation_status.snapshot();
    Json(EvaluationStatusResponse {
        loading: snapshot.is_loading(),
        error: snapshot.error,
        statuses: snapshot.statuses,
    })
}

pub async fn retry(State(state): State<AppState>) -> impl IntoResponse {
    state
        .evaluation_status
        .dispatch(ReconcilerAction::RetryRequested);
    StatusCode::ACCEPTED
}

#[cfg(test)]
mod evaluation_status_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::modules::evaluations::core::reduce::ReconcilerAction;
    use crate::shared::infrastructure::record_store::in_memory::InMemoryRecordStore;
    use crate::shell::state::AppState;
    use crate::tests::fixtures::students::StudentDataBuilder;

    use super::{retry, status};

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/evaluations/status", get(status))
            .route("/evaluations/retry", post(retry))
            .with_state(state)
    }

    #[tokio::test]
    async fn it_should_report_pending_statuses_and_the_last_error() {
        let state = AppState::for_tests(Arc::new(InMemoryRecordStore::new()));
        state
            .evaluation_status
            .dispatch(ReconcilerAction::StudentsLoaded(vec![
                StudentDataBuilder::new().record("s1"),
            ]));
        state
            .evaluation_status
            .dispatch(ReconcilerAction::SubscriptionFailed {
                source: "mentor_final_evaluations".into(),
                reason: "permission denied".into(),
            });

        let request = Request::builder()
            .uri("/evaluations/status")
            .body(Body::empty())
            .unwrap();
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["loading"], true);
        assert_eq!(body["error"], "mentor_final_evaluations: permission denied");
        assert_eq!(body["statuses"][0]["studentId"], "s1");
        assert_eq!(body["statuses"][0]["mentorMidterm"]["submitted"], false);
    }

    #[tokio::test]
    async fn it_should_clear_the_error_on_retry() {
        let state = AppState::for_tests(Arc::new(InMemoryRecordStore::new()));
        state
            .evaluation_status
            .dispatch(ReconcilerAction::SubscriptionFailed {
                source: "students".into(),
                reason: "offline".into(),
            });
        let request = Request::builder()
            .method("POST")
            .uri("/evaluations/retry")
            .body(Body::empty())
            .unwrap();
        let response = app(state.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(state.evaluation_status.snapshot().error, None);
    }
}
