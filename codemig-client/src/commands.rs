//! CLI command implementations

use crate::aggregator::HistoryRecord;
use crate::config::ClientConfig;
use crate::cycle::MigrationClient;
use crate::history::History;
use crate::transport::{HttpTransport, Transport};
use anyhow::{Context, Result};
use codemig_common::{HealthResponse, Kind};
use codemig_sandbox::{OutputSink, SandboxExecutor, StdoutSink};
use tracing::{info, warn};

/// Run `repeat` cycles of `kind(n)` against the configured server.
///
/// The first cycle receives source; later ones exercise the cache unless the
/// server's version moved in between. Retryable failures abort the remaining
/// cycles like any other error.
pub async fn execute_run(
    config: &ClientConfig,
    kind: Kind,
    n: i64,
    repeat: usize,
) -> Result<History> {
    let transport = HttpTransport::new(config.base_url.clone(), config.timeout)
        .context("Failed to build HTTP client")?;
    let executor = SandboxExecutor::new(StdoutSink).with_echo(config.echo);
    let mut client = MigrationClient::new(transport, executor);
    let mut history = History::new();

    for cycle in 1..=repeat.max(1) {
        info!(cycle, %kind, n, url = %config.base_url, "Starting cycle");
        let result = client.run_n(n, kind, &mut history).await;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                if e.is_retryable() {
                    warn!("Cycle {} failed, retrying may help: {}", cycle, e);
                }
                return Err(e).with_context(|| format!("Cycle {} failed", cycle));
            }
        };
        if !config.echo {
            if let Some(line) = record.outcome().last_line() {
                StdoutSink.emit(line);
            }
        }
    }

    Ok(history)
}

pub async fn execute_health(config: &ClientConfig) -> Result<HealthResponse> {
    let transport = HttpTransport::new(config.base_url.clone(), config.timeout)
        .context("Failed to build HTTP client")?;
    let health = transport
        .health()
        .await
        .with_context(|| format!("Health check against {} failed", config.base_url))?;
    Ok(health)
}

/// One line per record, as listed after a run
pub fn summary_line(record: &HistoryRecord) -> String {
    let n = record
        .n()
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_string());
    let mut line = format!(
        "{} {}({}) version={} cached={} server={} fetch={:.1}ms exec={:.1}ms",
        record.timestamp().format("%H:%M:%S"),
        record.kind(),
        n,
        record.artifact().version,
        record.cached(),
        record.artifact().server.as_deref().unwrap_or("-"),
        record.server_elapsed_ms(),
        record.client_elapsed_ms(),
    );
    if let Some(total) = record.total_numbers() {
        line.push_str(&format!(" total={}", total));
    }
    if let Some(error) = &record.outcome().error {
        line.push_str(&format!(" error=\"{}\"", error.message));
    }
    line
}
