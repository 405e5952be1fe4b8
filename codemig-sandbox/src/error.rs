//! Error types for the sandbox

use codemig_common::Kind;

/// The client broke the caching contract, or the server sent an artifact
/// that contradicts itself. Terminal for the current cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// Cached response for a source the client never retained
    #[error("Cached response references {kind} source version '{version}' that is not held locally")]
    CacheMiss { kind: Kind, version: String },

    /// Uncached response without source text
    #[error("Response for {kind} is not marked cached but carries no source text")]
    MissingSource { kind: Kind },

    /// Cached response that still carries source text
    #[error("Response for {kind} is marked cached but carries source text")]
    UnexpectedSource { kind: Kind },
}

/// Failure inside evaluation. Never leaves the executor; it becomes data in
/// the outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("unsupported source text")]
    UnsupportedSource,

    #[error("{0} is not defined")]
    NotDefined(String),

    #[error("invalid call expression '{0}'")]
    InvalidCall(String),

    /// Raised by the generated function itself
    #[error("{0}")]
    Thrown(String),

    #[error("evaluation aborted: {0}")]
    Panicked(String),
}
