//! codemig sandbox - evaluates server-supplied artifacts on the client
//!
//! Source text is never handed to a general-purpose interpreter. It must match
//! one of the known program definitions, and the call expression must fit a
//! tiny whitelisted grammar. Output produced during a call goes to a collector
//! threaded explicitly into evaluation, so the caller's own output sink is
//! never swapped out.

mod bignum;
mod cache;
mod error;
mod eval;
mod executor;
mod output;
mod types;

pub use cache::SourceCache;
pub use error::{EvalError, ProtocolError};
pub use executor::SandboxExecutor;
pub use output::{Capture, MemorySink, OutputSink, StdoutSink};
pub use types::{ExecutionFailure, ExecutionOutcome, ExecutionPhase, EXECUTION_ERROR_PREFIX};
