//! End-to-end tests for the randomgif binary against a wiremock Giphy

use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GIF_BYTES: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00";

async fn randomgif(dir: &Path, endpoint: &str, key: Option<&str>, tag: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_randomgif"));
    cmd.arg(tag)
        .arg("--output-dir")
        .arg(dir)
        .env("GIPHY_ENDPOINT", endpoint)
        .env_remove("GIPHY_API_KEY")
        .env_remove("RUST_LOG");
    if let Some(key) = key {
        cmd.env("GIPHY_API_KEY", key);
    }
    cmd.output().await.unwrap()
}

async fn mount_gif(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/gifs/random"))
        .and(query_param("tag", "cat"))
        .and(query_param("api_key", "env-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"image_original_url": format!("{}/media/cat.gif", server.uri())}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/media/cat.gif"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(GIF_BYTES.to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_saves_gif_with_key_from_env() {
    let mock_server = MockServer::start().await;
    mount_gif(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let endpoint = format!("{}/v1/gifs/random", mock_server.uri());
    let output = randomgif(dir.path(), &endpoint, Some("env-key"), "cat").await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let target = dir.path().join("cat.gif");
    assert_eq!(std::fs::read(&target).unwrap(), GIF_BYTES);
    assert!(String::from_utf8_lossy(&output.stdout).contains("cat.gif"));
}

#[tokio::test]
async fn test_missing_key_fails_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let endpoint = format!("{}/v1/gifs/random", mock_server.uri());
    let output = randomgif(dir.path(), &endpoint, None, "cat").await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Missing Giphy API key"));
    assert!(!dir.path().join("cat.gif").exists());
}

#[tokio::test]
async fn test_transport_failure_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = randomgif(
        dir.path(),
        "http://127.0.0.1:1/v1/gifs/random",
        Some("env-key"),
        "cat",
    )
    .await;

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Error: Failed to connect to server: "), "{stderr}");
    assert!(stderr.contains("127.0.0.1:1"), "{stderr}");
    assert!(!stderr.contains("env-key"), "{stderr}");
    assert!(output.stdout.is_empty());
    assert!(!dir.path().join("cat.gif").exists());
}

#[tokio::test]
async fn test_malformed_response_reports_shape_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/gifs/random"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {}})))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let endpoint = format!("{}/v1/gifs/random", mock_server.uri());
    let output = randomgif(dir.path(), &endpoint, Some("env-key"), "cat").await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unexpected response shape"));
    assert!(!dir.path().join("cat.gif").exists());
}
