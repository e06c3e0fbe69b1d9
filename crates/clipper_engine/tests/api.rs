use std::fs;
use std::time::Duration;

use clipper_engine::{
    ApiSettings, AtomicFileWriter, FailureKind, JobApi, JobRequest, ReqwestJobApi,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestJobApi {
    let base = Url::parse(&server.uri()).unwrap();
    ReqwestJobApi::new(ApiSettings::new(base)).unwrap()
}

fn job(source: &str, query: &str) -> JobRequest {
    JobRequest {
        video_source: source.to_string(),
        query: query.to_string(),
    }
}

#[tokio::test]
async fn submit_posts_json_and_returns_process_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process_video"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "video_source": "https://youtu.be/abc",
            "query": "dog"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "process_id": "42" })))
        .expect(1)
        .mount(&server)
        .await;

    let id = api_for(&server)
        .submit(&job("https://youtu.be/abc", "dog"))
        .await
        .expect("submit ok");
    assert_eq!(id, "42");
}

#[tokio::test]
async fn numeric_process_ids_are_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process_video"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "process_id": 1718000000 })),
        )
        .mount(&server)
        .await;

    let id = api_for(&server).submit(&job("a.mp4", "")).await.unwrap();
    assert_eq!(id, "1718000000");
}

#[tokio::test]
async fn submit_surfaces_server_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process_video"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Video source is required" })),
        )
        .mount(&server)
        .await;

    let err = api_for(&server).submit(&job("", "")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Server);
    assert_eq!(err.user_message(), "Video source is required");
}

#[tokio::test]
async fn submit_reports_bare_http_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process_video"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).submit(&job("a.mp4", "")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(502));
}

#[tokio::test]
async fn submit_rejects_answers_without_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process_video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = api_for(&server).submit(&job("a.mp4", "")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn status_decodes_optional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "progress": 100,
            "found_scene": true,
            "video_path": "/tmp/out.mp4"
        })))
        .mount(&server)
        .await;

    let report = api_for(&server).status("42").await.unwrap();
    assert_eq!(report.status, "completed");
    assert_eq!(report.progress_percent(), Some(100));
    assert_eq!(report.found_scene, Some(true));
    assert_eq!(report.message, None);
    assert!(report.is_terminal());
}

#[tokio::test]
async fn status_without_progress_has_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "Failed to upload video"
        })))
        .mount(&server)
        .await;

    let report = api_for(&server).status("7").await.unwrap();
    assert_eq!(report.progress_percent(), None);
    assert_eq!(report.message.as_deref(), Some("Failed to upload video"));
}

#[tokio::test]
async fn status_garbage_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = api_for(&server).status("7").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn status_path_escapes_the_handle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "indexing" })))
        .mount(&server)
        .await;

    let report = api_for(&server).status("a/b").await.unwrap();
    assert_eq!(report.status, "indexing");
}

#[tokio::test]
async fn unreachable_server_is_a_network_failure() {
    let api = ReqwestJobApi::new(ApiSettings {
        connect_timeout: Duration::from_millis(200),
        ..ApiSettings::new(Url::parse("http://127.0.0.1:9/").unwrap())
    })
    .unwrap();

    let err = api.status("1").await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
}

#[tokio::test]
async fn slow_status_times_out_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "status": "indexing" })),
        )
        .mount(&server)
        .await;

    let api = ReqwestJobApi::new(ApiSettings {
        request_timeout: Some(Duration::from_millis(50)),
        ..ApiSettings::new(Url::parse(&server.uri()).unwrap())
    })
    .unwrap();

    let err = api.status("1").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn download_streams_clip_to_output_dir() {
    let server = MockServer::start().await;
    let payload = vec![7u8; 64 * 1024];
    Mock::given(method("GET"))
        .and(path("/download/42"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(payload.clone(), "video/mp4"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("output"));
    let saved = api_for(&server)
        .download("42", "vertical_clip_42.mp4", &writer)
        .await
        .unwrap();

    assert_eq!(saved, temp.path().join("output").join("vertical_clip_42.mp4"));
    assert_eq!(fs::read(&saved).unwrap(), payload);
}

#[tokio::test]
async fn missing_clip_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Video not found" })))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    let err = api_for(&server)
        .download("42", "vertical_clip_42.mp4", &writer)
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert!(!temp.path().join("vertical_clip_42.mp4").exists());
}

#[test]
fn non_base_urls_are_rejected() {
    let err = ReqwestJobApi::new(ApiSettings::new(Url::parse("mailto:ops@example.com").unwrap()))
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
