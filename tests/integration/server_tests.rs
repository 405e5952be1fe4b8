//! The HTTP surface over a real listener

use crate::common::{setup_test_logging, TestServer};
use codemig_common::{CodeResponse, ErrorBody, HealthResponse, Kind};
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_reports_identity() {
    setup_test_logging();
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();

    let response = reqwest::get(format!("{}/health", server.url())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let health: HealthResponse = response.json().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.server, "server1");
    assert_eq!(health.version, "1.0.0");
    assert!(health.timestamp > 0);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_code_then_cached() {
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();

    let first: CodeResponse = reqwest::get(format!("{}/count/5", server.url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first.cached, Some(false));
    assert_eq!(first.code.as_deref(), Some(Kind::Count.source_text()));
    assert_eq!(first.call, "printCountToN(5);");
    assert_eq!(first.server.as_deref(), Some("server1"));

    let second: CodeResponse = reqwest::get(format!(
        "{}/count/6?client_version={}",
        server.url(),
        first.version.unwrap()
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();
    assert_eq!(second.cached, Some(true));
    assert_eq!(second.code, None);
    assert_eq!(second.call, "printCountToN(6);");
}

#[tokio::test]
async fn test_invalid_n_is_rejected_with_bound() {
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();

    for (path, fragment) in [
        ("count/-1", "n must be >= 0"),
        ("fibonacci/10001", "n must be <= 10000"),
        ("fib/ten", "between 0 and 10000"),
    ] {
        let response = reqwest::get(format!("{}/{}", server.url(), path))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");
        let body: ErrorBody = response.json().await.unwrap();
        assert!(body.error.contains(fragment), "{path}: {}", body.error);
    }
}

#[tokio::test]
async fn test_unknown_kind_is_not_found() {
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();

    let response = reqwest::get(format!("{}/primes/3", server.url()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = response.json().await.unwrap();
    assert!(body.error.contains("primes"));
}

#[tokio::test]
async fn test_cors_with_configured_origin() {
    let server = TestServer::start(codemig_server::ServerConfig {
        cors_origin: "http://localhost:3000".to_string(),
        ..Default::default()
    })
    .await
    .unwrap();

    let response = reqwest::Client::new()
        .get(format!("{}/health", server.url()))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
}

#[tokio::test]
async fn test_server_config_from_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "server_id = \"server2\"").unwrap();
    writeln!(file, "code_version = \"4.2.0\"").unwrap();
    let config = codemig_server::ServerConfig::from_toml_str(
        &std::fs::read_to_string(file.path()).unwrap(),
    )
    .unwrap();

    let server = TestServer::start(config).await.unwrap();
    assert_eq!(server.config().server_id, "server2");
    let health: HealthResponse = reqwest::get(format!("{}/health", server.url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.version, "4.2.0");
}
