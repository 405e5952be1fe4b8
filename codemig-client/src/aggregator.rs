//! Folds one completed cycle into a history record

use chrono::{DateTime, Utc};
use codemig_common::{CodeArtifact, Kind};
use codemig_sandbox::ExecutionOutcome;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    #[error("Precondition violated: {field} must be a finite, non-negative duration in ms, got {value}")]
    PreconditionViolation { field: &'static str, value: f64 },
}

/// Immutable snapshot of one request, as a presentation layer lists it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    id: Uuid,
    n: Option<u32>,
    artifact: CodeArtifact,
    outcome: ExecutionOutcome,
    server_elapsed_ms: f64,
    client_elapsed_ms: f64,
    timestamp: DateTime<Utc>,
    total_numbers: Option<u64>,
}

impl HistoryRecord {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The argument of the call expression
    pub fn n(&self) -> Option<u32> {
        self.n
    }

    pub fn kind(&self) -> Kind {
        self.artifact.kind
    }

    pub fn artifact(&self) -> &CodeArtifact {
        &self.artifact
    }

    pub fn outcome(&self) -> &ExecutionOutcome {
        &self.outcome
    }

    pub fn cached(&self) -> bool {
        self.artifact.cached
    }

    /// Round trip to the server, in milliseconds
    pub fn server_elapsed_ms(&self) -> f64 {
        self.server_elapsed_ms
    }

    /// Local evaluation time, in milliseconds
    pub fn client_elapsed_ms(&self) -> f64 {
        self.client_elapsed_ms
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// `n + 1` for count requests
    pub fn total_numbers(&self) -> Option<u64> {
        self.total_numbers
    }
}

/// Combine an artifact, its outcome and the two timings.
///
/// Rejects negative or non-finite timings; never fails otherwise.
pub fn combine(
    artifact: CodeArtifact,
    outcome: ExecutionOutcome,
    server_elapsed_ms: f64,
    client_elapsed_ms: f64,
) -> Result<HistoryRecord, AggregateError> {
    check_elapsed("server_elapsed_ms", server_elapsed_ms)?;
    check_elapsed("client_elapsed_ms", client_elapsed_ms)?;

    let n = call_argument(&artifact.call_expression);
    let total_numbers = match artifact.kind {
        Kind::Count => n.map(|n| u64::from(n) + 1),
        Kind::Fibonacci => None,
    };

    Ok(HistoryRecord {
        id: Uuid::new_v4(),
        n,
        artifact,
        outcome,
        server_elapsed_ms,
        client_elapsed_ms,
        timestamp: Utc::now(),
        total_numbers,
    })
}

fn check_elapsed(field: &'static str, value: f64) -> Result<(), AggregateError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AggregateError::PreconditionViolation { field, value })
    }
}

/// `printCountToN(12);` -> 12
fn call_argument(call: &str) -> Option<u32> {
    let (_, rest) = call.split_once('(')?;
    let (argument, _) = rest.split_once(')')?;
    argument.trim().parse().ok()
}
