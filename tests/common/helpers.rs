//! Client-side helpers

use async_trait::async_trait;
use codemig_client::{HttpTransport, MigrationClient, Transport, TransportError};
use codemig_common::{CodeArtifact, ExecutionRequest, HealthResponse};
use codemig_sandbox::{MemorySink, SandboxExecutor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub fn http_transport(url: &str) -> HttpTransport {
    HttpTransport::new(url, TEST_TIMEOUT).expect("Failed to build HTTP client")
}

/// Client with a memory console, echo off
pub fn memory_client<T: Transport>(transport: T) -> (MigrationClient<T>, MemorySink) {
    let console = MemorySink::new();
    let executor = SandboxExecutor::new(console.clone()).with_echo(false);
    (MigrationClient::new(transport, executor), console)
}

/// Routes every request to one of several servers, like a load balancer
/// whose backends are rolled one at a time
#[derive(Clone)]
pub struct SwitchingTransport {
    targets: Arc<Vec<HttpTransport>>,
    current: Arc<AtomicUsize>,
}

impl SwitchingTransport {
    pub fn new(urls: &[String]) -> Self {
        Self {
            targets: Arc::new(urls.iter().map(|url| http_transport(url)).collect()),
            current: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn switch_to(&self, index: usize) {
        assert!(index < self.targets.len(), "no target {index}");
        self.current.store(index, Ordering::SeqCst);
    }

    fn target(&self) -> &HttpTransport {
        &self.targets[self.current.load(Ordering::SeqCst)]
    }
}

#[async_trait]
impl Transport for SwitchingTransport {
    async fn fetch(&self, request: &ExecutionRequest) -> Result<CodeArtifact, TransportError> {
        self.target().fetch(request).await
    }

    async fn health(&self) -> Result<HealthResponse, TransportError> {
        self.target().health().await
    }
}
