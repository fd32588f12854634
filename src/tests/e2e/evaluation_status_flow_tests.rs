use crate::modules::evaluations::adapters::outbound::status_store::EvaluationStatusStore;
use crate::modules::evaluations::core::submission::EvaluationKind;
use crate::modules::evaluations::use_cases::reconcile_evaluations::handler::ReconcileEvaluationsHandler;
use crate::modules::reports::core::institution::InstitutionMeta;
use crate::shared::infrastructure::record_store::in_memory::InMemoryRecordStore;
use crate::shared::infrastructure::record_store::{RecordStore, encode};
use crate::shell::http::router;
use crate::shell::state::AppState;
use crate::shell::workers::spawn_reconciler;
use crate::tests::fixtures::evaluations::EvaluationSubmissionBuilder;
use crate::tests::fixtures::students::StudentDataBuilder;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tower::ServiceExt;

#[tokio::test]
async fn reports_a_survey_submitted_under_the_students_name() {
    let store = Arc::new(InMemoryRecordStore::new());
    let status = Arc::new(EvaluationStatusStore::new());
    let app = router(AppState::new(
        store.clone(),
        status.clone(),
        InstitutionMeta::default(),
    ));
    let (stop, shutdown) = watch::channel(false);
    let worker = spawn_reconciler(
        ReconcileEvaluationsHandler::new(store.clone(), status.clone()),
        shutdown,
    );

    let create = Request::builder()
        .method("POST")
        .uri("/students")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_vec(&StudentDataBuilder::new().build()).unwrap(),
        ))
        .unwrap();
    let response = app.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let kind = EvaluationKind::MentorMidterm;
    let submission = EvaluationSubmissionBuilder::anonymous()
        .student_name("juan dela cruz")
        .build();
    store
        .set(kind.collection(), "e1", encode(kind.collection(), "e1", &submission).unwrap())
        .await
        .unwrap();

    let mut receiver = status.subscribe();
    tokio::time::timeout(
        Duration::from_secs(2),
        receiver.wait_for(|s| s.statuses.iter().any(|st| st.mentor_midterm.submitted)),
    )
    .await
    .expect("reconciler never caught up")
    .expect("status store closed");

    let request = Request::builder()
        .uri("/evaluations/status")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let slot = &body["statuses"][0]["mentorMidterm"];
    assert_eq!(slot["submitted"], true);
    assert_eq!(slot["rule"], "name");
    assert_eq!(slot["evaluationId"], "e1");
    assert_eq!(slot["submittedAt"], "2025-03-03T11:06:40Z");
    assert_eq!(body["statuses"][0]["studentFinal"]["submitted"], false);

    stop.send(true).unwrap();
    worker.await.unwrap();
}
