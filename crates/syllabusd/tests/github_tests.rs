//! GitHub file sink tests against a mock contents API.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::NaiveDate;
use syllabus_shared::SyllabusError;
use syllabusd::config::GitHubConfig;
use syllabusd::github::{FileSink, GitHubFileSink};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FILE_PATH: &str = "/repos/acme/courses/contents/scenarios/Intro_to_AI__20260314.md";

fn sink(server: &MockServer) -> GitHubFileSink {
    GitHubFileSink::new(Some(GitHubConfig {
        token: "ghp_test".to_string(),
        owner: "acme".to_string(),
        repo: "courses".to_string(),
        branch: "main".to_string(),
        api_url: server.uri(),
    }))
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

#[tokio::test]
async fn test_commit_creates_file() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(FILE_PATH))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "content": { "path": "scenarios/Intro_to_AI__20260314.md" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = sink(&server)
        .commit_on("Intro to AI!", "# Scenario\nBody", date())
        .await
        .unwrap();
    assert_eq!(result.as_deref(), Some("scenarios/Intro_to_AI__20260314.md"));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["message"], "Add scenario for Intro to AI!");
    assert_eq!(body["branch"], "main");
    let content = BASE64.decode(body["content"].as_str().unwrap()).unwrap();
    assert_eq!(content, b"# Scenario\nBody");
}

#[tokio::test]
async fn test_existing_file_is_rejected_not_overwritten() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(FILE_PATH))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "message": "Invalid request.\n\n\"sha\" wasn't supplied."
        })))
        .mount(&server)
        .await;

    let err = sink(&server)
        .commit_on("Intro to AI!", "second version", date())
        .await
        .unwrap_err();

    match err {
        SyllabusError::RemoteCommit(msg) => {
            assert!(msg.contains("already exists in acme/courses"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("sha").is_none());
}

#[tokio::test]
async fn test_server_error_is_remote_commit_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = sink(&server)
        .commit_on("Networks", "body", date())
        .await
        .unwrap_err();
    assert!(matches!(err, SyllabusError::RemoteCommit(_)));
    assert_eq!(err.code(), -32040);
}

#[tokio::test]
async fn test_disabled_sink_writes_nothing() {
    let sink = GitHubFileSink::disabled();
    assert!(!sink.is_configured());
    assert_eq!(sink.commit("Anything", "body").await.unwrap(), None);
}
