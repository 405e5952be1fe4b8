//! Core types for sandbox execution

use serde::{Deserialize, Serialize};

/// Prefix of the output line that reports an execution failure
pub const EXECUTION_ERROR_PREFIX: &str = "Execution Error: ";

/// Lifecycle of one `execute()` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionPhase {
    Idle,
    /// Resolving and loading source text
    Loading,
    /// Running the call expression
    Executing,
    Done,
    Failed,
}

/// Failure raised while evaluating source or running the called function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionFailure {
    pub message: String,
}

/// Lines emitted by one execution plus the failure, if any.
///
/// When `error` is set, the last line is `Execution Error: <message>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub output_lines: Vec<String>,
    pub error: Option<ExecutionFailure>,
}

impl ExecutionOutcome {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    /// The last line, which carries the return value for value-producing calls
    pub fn last_line(&self) -> Option<&str> {
        self.output_lines.last().map(String::as_str)
    }
}
