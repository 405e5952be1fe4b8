//! The per-request description of a computation

use crate::kind::Kind;
use crate::messages::CodeResponse;
use serde::{Deserialize, Serialize};

/// Source text plus call expression, as produced by the server.
///
/// `source_text` is present exactly when `cached` is false. The call
/// expression is always present and always carries the request's `n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeArtifact {
    pub kind: Kind,
    pub source_text: Option<String>,
    pub call_expression: String,
    pub version: String,
    pub cached: bool,
    /// Identifier of the instance that answered
    pub server: Option<String>,
}

impl CodeArtifact {
    /// Rebuild an artifact from a wire response.
    ///
    /// The kind is not part of the body; the caller knows which path it
    /// requested. A missing `version` becomes an empty string, which no
    /// cache will key on.
    pub fn from_response(kind: Kind, response: CodeResponse) -> Self {
        Self {
            kind,
            cached: response.cached.unwrap_or(false),
            source_text: response.code,
            call_expression: response.call,
            version: response.version.unwrap_or_default(),
            server: response.server,
        }
    }

    pub fn into_response(self) -> CodeResponse {
        CodeResponse {
            code: self.source_text,
            call: self.call_expression,
            server: self.server,
            version: Some(self.version),
            cached: Some(self.cached),
        }
    }

    /// Whether `source_text` presence agrees with `cached`
    pub fn is_consistent(&self) -> bool {
        self.source_text.is_some() != self.cached
    }
}
