//! One fetch, evaluate, record cycle per call

use crate::aggregator::{combine, AggregateError, HistoryRecord};
use crate::history::History;
use crate::transport::{Transport, TransportError};
use codemig_common::{ExecutionRequest, Kind, ValidationError};
use codemig_sandbox::{ExecutionPhase, ProtocolError, SandboxExecutor, SourceCache};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Anything that aborts a cycle before a record is produced
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl CycleError {
    pub fn is_retryable(&self) -> bool {
        match self {
            CycleError::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Drives cycles against one server.
///
/// Owns the source cache and the executor. `run` takes `&mut self`, so one
/// client never has two cycles in flight.
pub struct MigrationClient<T> {
    transport: T,
    executor: SandboxExecutor,
    cache: SourceCache,
}

impl<T: Transport> MigrationClient<T> {
    pub fn new(transport: T, executor: SandboxExecutor) -> Self {
        Self {
            transport,
            executor,
            cache: SourceCache::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &SourceCache {
        &self.cache
    }

    /// Forget every retained source; the next request for any kind is uncached
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn executor_phase(&self) -> ExecutionPhase {
        self.executor.phase()
    }

    /// Validate `n` and run a cycle for it
    pub async fn run_n<'h>(
        &mut self,
        n: i64,
        kind: Kind,
        history: &'h mut History,
    ) -> Result<&'h HistoryRecord, CycleError> {
        let request = ExecutionRequest::new(n, kind)?;
        self.run(request, history).await
    }

    /// Fetch, evaluate and append a record to `history`.
    ///
    /// Without an explicit client version the request carries the newest
    /// version held for its kind.
    pub async fn run<'h>(
        &mut self,
        request: ExecutionRequest,
        history: &'h mut History,
    ) -> Result<&'h HistoryRecord, CycleError> {
        let kind = request.kind();
        let held = match request.client_version() {
            Some(_) => None,
            None => self.cache.latest_version(kind).map(str::to_string),
        };
        let request = match held {
            Some(version) => request.with_client_version(version),
            None => request,
        };

        let started = Instant::now();
        let artifact = self
            .transport
            .fetch(&request)
            .await
            .inspect_err(|e| warn!(%kind, n = request.n(), "Fetch failed: {}", e))?;
        let server_elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        if !artifact.cached {
            if let Some(source) = &artifact.source_text {
                if self.cache.store(kind, &artifact.version, source.clone()) {
                    debug!(%kind, version = %artifact.version, "Source retained");
                }
            }
        }

        let started = Instant::now();
        let outcome = self.executor.execute(&artifact, &self.cache)?;
        let client_elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let record = combine(artifact, outcome, server_elapsed_ms, client_elapsed_ms)?;
        info!(
            %kind,
            n = request.n(),
            cached = record.cached(),
            success = record.outcome().success(),
            server_elapsed_ms,
            client_elapsed_ms,
            "Cycle complete"
        );
        Ok(history.push(record))
    }
}
