//! HTTP route tests driven through `tower::ServiceExt::oneshot`.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use common::{memory_store, pipeline, BrokenStore, FakeFileSink, FakeGenerator};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use syllabus_shared::SyllabusError;
use syllabusd::github::GitHubFileSink;
use syllabusd::pipeline::Pipeline;
use syllabusd::server::{router, AppState};
use syllabusd::store::{CourseStore, SqliteCourseStore};
use tower::ServiceExt;

fn app(pipeline: Pipeline) -> Router {
    router(Arc::new(AppState::new(pipeline)), Duration::from_secs(30))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn default_app() -> (Router, Arc<SqliteCourseStore>) {
    let store = memory_store().await;
    let app = app(pipeline(
        Arc::new(FakeGenerator::ok()),
        store.clone(),
        Arc::new(FakeFileSink::default()),
    ));
    (app, store)
}

#[tokio::test]
async fn test_generate_returns_all_results() {
    let (app, _store) = default_app().await;

    let (status, json) = call(&app, Method::GET, "/generate?course_title=Rust%20101", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["scenario"].as_str().unwrap().starts_with("SCENARIO["));
    assert_eq!(json["record_id"], "1");
    assert_eq!(json["file_path"], "scenarios/Rust 101.md");
    assert!(json.get("warnings").is_none());
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_generate_default_level_is_stored() {
    let (app, _store) = default_app().await;
    call(&app, Method::GET, "/generate?course_title=Geometry", None).await;

    let (_, json) = call(&app, Method::GET, "/scenarios", None).await;
    assert_eq!(json["scenarios"][0]["level"], "intermediate");
    assert_eq!(json["scenarios"][0]["title"], "Geometry");
}

#[tokio::test]
async fn test_generate_errors_are_structured() {
    let app = app(pipeline(
        Arc::new(FakeGenerator::failing(|| {
            SyllabusError::Generation("model crashed".to_string())
        })),
        memory_store().await,
        Arc::new(GitHubFileSink::disabled()),
    ));

    let (status, json) = call(&app, Method::GET, "/generate?course_title=Rust", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["error"], "Generation failed: model crashed");

    let (status, json) = call(&app, Method::GET, "/generate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["error"].as_str().unwrap().contains("course_title"));

    let (_, json) = call(&app, Method::GET, "/generate?course_title=%20%20", None).await;
    assert_eq!(json["error"], "course_title must not be empty");
}

#[tokio::test]
async fn test_generate_reports_partial_persistence() {
    let app = app(pipeline(
        Arc::new(FakeGenerator::ok()),
        Arc::new(BrokenStore::default()),
        Arc::new(FakeFileSink::default()),
    ));

    let (_, json) = call(&app, Method::GET, "/generate?course_title=Drama&level=Beginner", None).await;

    assert!(json["record_id"].is_null());
    assert_eq!(json["file_path"], "scenarios/Drama.md");
    assert_eq!(json["warnings"][0], "Course store write failed: database is locked");
}

#[tokio::test]
async fn test_scenarios_limit_and_order() {
    let (app, store) = default_app().await;
    let t1 = Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap();
    for (i, title) in ["t1", "t2", "t3", "t4"].iter().enumerate() {
        store
            .insert_at(title, "s", "intermediate", t1 + ChronoDuration::days(i as i64))
            .await
            .unwrap();
    }

    let (_, json) = call(&app, Method::GET, "/scenarios?limit=2", None).await;
    let titles: Vec<&str> = json["scenarios"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["t4", "t3"]);

    let (_, json) = call(&app, Method::GET, "/scenarios", None).await;
    assert_eq!(json["scenarios"].as_array().unwrap().len(), 4);

    let (_, json) = call(&app, Method::GET, "/scenarios?limit=many", None).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_scenarios_store_failure_is_structured() {
    let app = app(pipeline(
        Arc::new(FakeGenerator::ok()),
        Arc::new(BrokenStore::default()),
        Arc::new(GitHubFileSink::disabled()),
    ));

    let (status, json) = call(&app, Method::GET, "/scenarios?limit=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["error"], "Course store read failed: database is locked");

    let (_, json) = call(&app, Method::GET, "/titles", None).await;
    assert_eq!(json["titles"], serde_json::json!([]));
}

#[tokio::test]
async fn test_titles() {
    let (app, _store) = default_app().await;
    call(&app, Method::GET, "/generate?course_title=Alpha", None).await;
    call(&app, Method::GET, "/generate?course_title=Beta", None).await;

    let (_, json) = call(&app, Method::GET, "/titles", None).await;
    assert_eq!(json["titles"], serde_json::json!(["Beta", "Alpha"]));
}

#[tokio::test]
async fn test_intake_session_over_http() {
    let (app, store) = default_app().await;

    let (status, json) = call(
        &app,
        Method::POST,
        "/v1/intake/sessions",
        Some(serde_json::json!({ "language": "en" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step"], 1);
    let id = json["session_id"].as_str().unwrap().to_string();
    let messages_uri = format!("/v1/intake/sessions/{}/messages", id);

    let mut last = Value::Null;
    for text in ["yes", "Poetry", "Advanced", "adults", "2 weeks", "English", "Sonnets"] {
        let (status, json) = call(
            &app,
            Method::POST,
            &messages_uri,
            Some(serde_json::json!({ "text": text })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        last = json;
    }
    assert_eq!(last["step"], 0);
    assert_eq!(store.list_titles().await, vec!["Poetry"]);

    let (_, snapshot) = call(&app, Method::GET, &format!("/v1/intake/sessions/{}", id), None).await;
    assert_eq!(snapshot["step"], 0);
    assert_eq!(snapshot["history"][0]["role"], "assistant");
    assert_eq!(snapshot["history"][1]["role"], "user");
    assert_eq!(snapshot["history"][1]["message"], "yes");

    let (status, _) = call(&app, Method::DELETE, &format!("/v1/intake/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, json) = call(
        &app,
        Method::POST,
        &messages_uri,
        Some(serde_json::json!({ "text": "yes" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains(&id));
}

#[tokio::test]
async fn test_intake_session_recovers_after_request_timeout() {
    let store = memory_store().await;
    let app = router(
        Arc::new(AppState::new(pipeline(
            Arc::new(FakeGenerator::slow(Duration::from_millis(500))),
            store.clone(),
            Arc::new(GitHubFileSink::disabled()),
        ))),
        Duration::from_millis(100),
    );

    let (_, json) = call(&app, Method::POST, "/v1/intake/sessions", None).await;
    let id = json["session_id"].as_str().unwrap().to_string();
    let messages_uri = format!("/v1/intake/sessions/{}/messages", id);

    let mut last_status = StatusCode::OK;
    for text in ["yes", "Ceramics", "Beginner", "hobbyists", "3 weeks", "English", "Glazes"] {
        let (status, _) = call(
            &app,
            Method::POST,
            &messages_uri,
            Some(serde_json::json!({ "text": text })),
        )
        .await;
        last_status = status;
    }
    assert_eq!(last_status, StatusCode::REQUEST_TIMEOUT);

    tokio::time::sleep(Duration::from_millis(800)).await;

    let (_, snapshot) = call(&app, Method::GET, &format!("/v1/intake/sessions/{}", id), None).await;
    assert_eq!(snapshot["step"], 0);
    assert_eq!(store.list_titles().await, vec!["Ceramics"]);

    let (status, json) = call(
        &app,
        Method::POST,
        &messages_uri,
        Some(serde_json::json!({ "text": "yes" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step"], 2);
}

#[tokio::test]
async fn test_intake_session_default_language() {
    let (app, _store) = default_app().await;
    let (_, json) = call(&app, Method::POST, "/v1/intake/sessions", None).await;
    assert_eq!(
        json["messages"][0],
        syllabus_shared::Language::En.messages().welcome
    );
}

#[tokio::test]
async fn test_health() {
    let (app, _store) = default_app().await;
    let (status, json) = call(&app, Method::GET, "/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["backend"]["model"], "fake");
    assert_eq!(json["file_host_configured"], true);
    assert_eq!(json["active_sessions"], 0);
}
