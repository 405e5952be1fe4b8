//! HttpTransport against a real server and against failing fakes

use crate::common::{http_transport, TestServer};
use assert_matches::assert_matches;
use codemig_client::{HttpTransport, Transport, TransportError};
use codemig_common::{ExecutionRequest, Kind};
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_negotiates_version() {
    let server = TestServer::with_version("server1", "2.0.0").await.unwrap();
    let transport = http_transport(&server.url());

    let request = ExecutionRequest::new(10, Kind::Fibonacci).unwrap();
    let fresh = transport.fetch(&request).await.unwrap();
    assert!(!fresh.cached);
    assert_eq!(fresh.version, "2.0.0");
    assert!(fresh.is_consistent());

    let cached = transport
        .fetch(&request.clone().with_client_version("2.0.0"))
        .await
        .unwrap();
    assert!(cached.cached);
    assert_eq!(cached.source_text, None);
    assert_eq!(cached.call_expression, "fibonacci(10)");

    let stale = transport
        .fetch(&request.with_client_version("1.0.0"))
        .await
        .unwrap();
    assert!(!stale.cached);
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::with_version("server2", "1.0.0").await.unwrap();
    let health = http_transport(&server.url()).health().await.unwrap();
    assert_eq!(health.server, "server2");
}

#[tokio::test]
async fn test_stopped_server_is_unreachable() {
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();
    let url = server.url();
    server.stop().await.unwrap();

    let err = http_transport(&url).health().await.unwrap_err();
    assert_matches!(err, TransportError::Unreachable { .. });
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_bad_gateway_is_unavailable() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock)
        .await;

    let request = ExecutionRequest::new(1, Kind::Count).unwrap();
    let err = http_transport(&mock.uri()).fetch(&request).await.unwrap_err();
    assert_eq!(err, TransportError::Unavailable { status: 502 });
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock)
        .await;

    let transport = HttpTransport::new(mock.uri(), Duration::from_millis(200)).unwrap();
    let err = transport.health().await.unwrap_err();
    assert_matches!(err, TransportError::Timeout(_));
}
