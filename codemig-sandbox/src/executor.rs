//! Sandbox executor - runs one artifact at a time

use crate::cache::SourceCache;
use crate::error::{EvalError, ProtocolError};
use crate::eval::{Scope, Value};
use crate::output::{Capture, OutputSink};
use crate::types::{ExecutionFailure, ExecutionOutcome, ExecutionPhase, EXECUTION_ERROR_PREFIX};
use codemig_common::CodeArtifact;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Evaluates artifacts against a fresh scope and captures what they print.
///
/// `execute` takes `&mut self`, so two executions on the same executor can
/// never overlap. The console sink belongs to the caller and is never
/// replaced; while a call runs, lines go to a per-call [`Capture`] that
/// optionally echoes them to the console.
pub struct SandboxExecutor {
    console: Box<dyn OutputSink + Send>,
    echo: bool,
    phase: ExecutionPhase,
}

impl SandboxExecutor {
    pub fn new(console: impl OutputSink + Send + 'static) -> Self {
        Self {
            console: Box::new(console),
            echo: true,
            phase: ExecutionPhase::Idle,
        }
    }

    /// Forward captured lines to the console as they are produced
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn phase(&self) -> ExecutionPhase {
        self.phase
    }

    /// The caller's own output channel
    pub fn console(&mut self) -> &mut (dyn OutputSink + Send) {
        self.console.as_mut()
    }

    /// Run an artifact.
    ///
    /// Cached artifacts take their source from `cache`. Failures inside
    /// evaluation come back as part of the outcome; only a broken caching
    /// contract is returned as an error.
    pub fn execute(
        &mut self,
        artifact: &CodeArtifact,
        cache: &SourceCache,
    ) -> Result<ExecutionOutcome, ProtocolError> {
        self.phase = ExecutionPhase::Loading;

        let source = match resolve_source(artifact, cache) {
            Ok(source) => source,
            Err(e) => {
                warn!(kind = %artifact.kind, version = %artifact.version, "{}", e);
                self.phase = ExecutionPhase::Failed;
                return Err(e);
            }
        };
        debug!(
            kind = %artifact.kind,
            cached = artifact.cached,
            source_len = source.len(),
            "Source resolved"
        );

        self.phase = ExecutionPhase::Executing;

        let mut capture = if self.echo {
            Capture::tee(self.console.as_mut())
        } else {
            Capture::new()
        };
        let result = evaluate(source, &artifact.call_expression, &mut capture);
        let mut output_lines = capture.into_lines();

        let outcome = match result {
            Ok(value) => {
                if let Value::Number(number) = value {
                    output_lines.push(number.to_string());
                }
                ExecutionOutcome {
                    output_lines,
                    error: None,
                }
            }
            Err(e) => {
                let message = e.to_string();
                output_lines.push(format!("{EXECUTION_ERROR_PREFIX}{message}"));
                ExecutionOutcome {
                    output_lines,
                    error: Some(ExecutionFailure { message }),
                }
            }
        };

        self.phase = if outcome.success() {
            ExecutionPhase::Done
        } else {
            ExecutionPhase::Failed
        };
        info!(
            kind = %artifact.kind,
            call = %artifact.call_expression,
            lines = outcome.output_lines.len(),
            success = outcome.success(),
            "Execution finished"
        );

        Ok(outcome)
    }
}

impl std::fmt::Debug for SandboxExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SandboxExecutor")
            .field("echo", &self.echo)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

fn resolve_source<'a>(
    artifact: &'a CodeArtifact,
    cache: &'a SourceCache,
) -> Result<&'a str, ProtocolError> {
    if !artifact.is_consistent() {
        let kind = artifact.kind;
        return Err(if artifact.cached {
            ProtocolError::UnexpectedSource { kind }
        } else {
            ProtocolError::MissingSource { kind }
        });
    }
    match artifact.source_text.as_deref() {
        Some(source) => Ok(source),
        None => cache
            .get(artifact.kind, &artifact.version)
            .ok_or_else(|| ProtocolError::CacheMiss {
                kind: artifact.kind,
                version: artifact.version.clone(),
            }),
    }
}

/// Load source into a fresh scope, then run the call. A panic anywhere in
/// here is reported like any other evaluation failure.
fn evaluate(source: &str, call: &str, out: &mut Capture<'_>) -> Result<Value, EvalError> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        let mut scope = Scope::new();
        scope.load(source)?;
        scope.call(call, out)
    }))
    .unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(EvalError::Panicked(reason))
    })
}
