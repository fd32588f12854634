use crate::modules::students::core::projections::{
    COMPANIES_COLLECTION, SectionStudentEntry, company_students_collection,
    section_students_collection,
};
use crate::modules::students::core::student::STUDENTS_COLLECTION;
use crate::shared::infrastructure::record_store::in_memory::InMemoryRecordStore;
use crate::shared::infrastructure::record_store::{RecordStore, get_as};
use crate::shell::http::router;
use crate::shell::state::AppState;
use crate::tests::fixtures::students::StudentDataBuilder;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn json_request(method: &str, uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-actor-id", "instructor-1")
        .header("x-actor-name", "Prof. Reyes")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn keeps_section_and_company_entries_in_step_with_the_student() {
    let store = Arc::new(InMemoryRecordStore::new());
    let app = router(AppState::for_tests(store.clone()));

    let (status, created) = body_json(
        &app,
        json_request(
            "POST",
            "/students",
            &StudentDataBuilder::new().section("S1").partner_company("Acme Corp").build(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(store.list(&section_students_collection("S1")).await.unwrap().len(), 1);
    assert_eq!(store.list(&company_students_collection("acme_corp")).await.unwrap().len(), 1);

    // Move section, respell company: section entry moves, company entry stays put.
    let (status, _) = body_json(
        &app,
        json_request(
            "PUT",
            &format!("/students/{id}"),
            &StudentDataBuilder::new().section("S2").partner_company(" ACME  corp ").build(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(store.list(&section_students_collection("S1")).await.unwrap().is_empty());
    let moved: Option<SectionStudentEntry> =
        get_as(&*store, &section_students_collection("S2"), &id).await.unwrap();
    assert!(moved.is_some());
    assert_eq!(store.list(COMPANIES_COLLECTION).await.unwrap().len(), 1);

    let (status, _) = body_json(&app, empty_request("DELETE", &format!("/students/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(store.list(STUDENTS_COLLECTION).await.unwrap().is_empty());
    assert!(store.list(&section_students_collection("S2")).await.unwrap().is_empty());
    assert!(store
        .list(&company_students_collection("acme_corp"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn repairs_entries_missed_while_the_read_models_were_unavailable() {
    let store = Arc::new(InMemoryRecordStore::new());
    let app = router(AppState::for_tests(store.clone()));

    store.fail_collection("sections").await;
    let (status, created) = body_json(
        &app,
        json_request("POST", "/students", &StudentDataBuilder::new().section("S1").build()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(store.list(&section_students_collection("S1")).await.is_err());

    store.restore_collection("sections").await;
    let (status, report) = body_json(&app, empty_request("POST", "/projections/repair")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["studentsScanned"], 1);
    assert_eq!(report["upserted"], 1);

    let repaired: Option<SectionStudentEntry> =
        get_as(&*store, &section_students_collection("S1"), &id).await.unwrap();
    assert_eq!(repaired.map(|e| e.student_id), Some(id));

    let profile = serde_json::json!({ "id": "instructor-1", "name": "Prof. Reyes", "sections": "S1" });
    let (_, claims) = body_json(&app, json_request("POST", "/instructors/sections", &profile)).await;
    assert_eq!(claims[0]["outcome"], "alreadyOwned");
}

#[tokio::test]
async fn reports_a_section_claimed_by_another_instructor() {
    let store = Arc::new(InMemoryRecordStore::new());
    let app = router(AppState::for_tests(store));
    let profile = |id: &str| {
        serde_json::json!({ "id": id, "name": id, "sections": "S1" })
    };

    let (_, first) = body_json(&app, json_request("POST", "/instructors/sections", &profile("a"))).await;
    let (_, second) = body_json(&app, json_request("POST", "/instructors/sections", &profile("b"))).await;

    assert_eq!(first[0]["outcome"], "created");
    assert_eq!(second[0]["outcome"], "claimedByOther");
    assert_eq!(second[0]["instructorId"], "a");
}
