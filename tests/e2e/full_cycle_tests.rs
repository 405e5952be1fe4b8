//! Full cycles: real server, HTTP transport, sandbox, history

use crate::common::{http_transport, memory_client, setup_test_logging, SwitchingTransport, TestServer};
use assert_matches::assert_matches;
use codemig_client::{CycleError, History};
use codemig_common::{ExecutionRequest, Kind};
use codemig_sandbox::{ExecutionPhase, OutputSink};

#[tokio::test]
async fn test_count_to_five() {
    setup_test_logging();
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();
    let (mut client, _) = memory_client(http_transport(&server.url()));
    let mut history = History::new();

    let record = client.run_n(5, Kind::Count, &mut history).await.unwrap();
    assert_eq!(
        record.outcome().output_lines,
        vec!["0", "1", "2", "3", "4", "5"]
    );
    assert!(record.outcome().success());
    assert!(!record.cached());
    assert_eq!(record.total_numbers(), Some(6));
    assert_eq!(record.artifact().server.as_deref(), Some("server1"));
    assert_eq!(client.executor_phase(), ExecutionPhase::Done);
}

#[tokio::test]
async fn test_count_lines_match_index() {
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();
    let (mut client, _) = memory_client(http_transport(&server.url()));
    let mut history = History::new();

    for n in [0, 1, 37, 500] {
        let record = client.run_n(n, Kind::Count, &mut history).await.unwrap();
        let lines = &record.outcome().output_lines;
        assert_eq!(lines.len(), n as usize + 1);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line, &i.to_string());
        }
    }
}

#[tokio::test]
async fn test_fibonacci_values() {
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();
    let (mut client, _) = memory_client(http_transport(&server.url()));
    let mut history = History::new();

    for (n, expected) in [(0, "0"), (1, "1"), (10, "55"), (90, "2880067194370816120")] {
        let record = client.run_n(n, Kind::Fibonacci, &mut history).await.unwrap();
        assert_eq!(record.outcome().last_line(), Some(expected), "F({n})");
    }

    let record = client.run_n(10_000, Kind::Fibonacci, &mut history).await.unwrap();
    let value = record.outcome().last_line().unwrap();
    assert_eq!(value.len(), 2090);
    assert!(value.starts_with("33644764876431783266"));
}

#[tokio::test]
async fn test_second_request_is_served_from_cache() {
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();
    let (mut client, _) = memory_client(http_transport(&server.url()));
    let mut history = History::new();

    client.run_n(3, Kind::Count, &mut history).await.unwrap();
    let record = client.run_n(4, Kind::Count, &mut history).await.unwrap();
    assert!(record.cached());
    assert_eq!(record.artifact().source_text, None);
    assert_eq!(record.outcome().output_lines.len(), 5);

    // The cache is per kind
    let record = client.run_n(4, Kind::Fibonacci, &mut history).await.unwrap();
    assert!(!record.cached());
    assert_eq!(record.outcome().last_line(), Some("3"));

    let cached: Vec<bool> = history.iter().map(|r| r.cached()).collect();
    assert_eq!(cached, vec![false, true, false]);
}

#[tokio::test]
async fn test_version_bump_invalidates_cache() {
    let old = TestServer::with_version("server1", "1.0.0").await.unwrap();
    let new = TestServer::with_version("server2", "1.1.0").await.unwrap();
    let transport = SwitchingTransport::new(&[old.url(), new.url()]);
    let (mut client, _) = memory_client(transport.clone());
    let mut history = History::new();

    client.run_n(5, Kind::Count, &mut history).await.unwrap();
    assert!(client.run_n(5, Kind::Count, &mut history).await.unwrap().cached());

    transport.switch_to(1);
    let record = client.run_n(5, Kind::Count, &mut history).await.unwrap();
    assert!(!record.cached());
    assert_eq!(record.artifact().version, "1.1.0");
    assert_eq!(record.artifact().server.as_deref(), Some("server2"));
    assert_eq!(client.cache().latest_version(Kind::Count), Some("1.1.0"));

    assert!(client.run_n(6, Kind::Count, &mut history).await.unwrap().cached());
}

#[tokio::test]
async fn test_cleared_cache_requests_source_again() {
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();
    let (mut client, _) = memory_client(http_transport(&server.url()));
    let mut history = History::new();

    client.run_n(2, Kind::Fibonacci, &mut history).await.unwrap();
    client.clear_cache();
    let record = client.run_n(2, Kind::Fibonacci, &mut history).await.unwrap();
    assert!(!record.cached());
}

#[tokio::test]
async fn test_explicit_unknown_version_is_protocol_error() {
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();
    let (mut client, _) = memory_client(http_transport(&server.url()));
    let mut history = History::new();

    // Claims a version the client never received
    let request = ExecutionRequest::new(3, Kind::Count)
        .unwrap()
        .with_client_version("1.0.0");
    let err = client.run(request, &mut history).await.unwrap_err();
    assert_matches!(err, CycleError::Protocol(_));
    assert_eq!(client.executor_phase(), ExecutionPhase::Failed);
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_invalid_n_produces_no_record() {
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();
    let (mut client, _) = memory_client(http_transport(&server.url()));
    let mut history = History::new();

    for n in [-1, 10_001] {
        let err = client.run_n(n, Kind::Count, &mut history).await.unwrap_err();
        assert_matches!(err, CycleError::Validation(_));
    }
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_console_is_not_captured() {
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();
    let (mut client, console) = memory_client(http_transport(&server.url()));
    let mut history = History::new();

    client.run_n(3, Kind::Count, &mut history).await.unwrap();

    // Anything written to the console after a run stays on the console
    let mut other = console.clone();
    other.emit("marker");
    assert_eq!(console.lines(), vec!["marker"]);
    let latest = history.latest().unwrap();
    assert!(!latest.outcome().output_lines.iter().any(|l| l == "marker"));
}

#[tokio::test]
async fn test_unreachable_server_is_retryable() {
    let server = TestServer::with_version("server1", "1.0.0").await.unwrap();
    let url = server.url();
    server.stop().await.unwrap();

    let (mut client, _) = memory_client(http_transport(&url));
    let mut history = History::new();
    let err = client.run_n(1, Kind::Count, &mut history).await.unwrap_err();
    assert_matches!(err, CycleError::Transport(_));
    assert!(err.is_retryable());
}
