//! Code generation for the closed set of kinds

use codemig_common::{parse_n, validate_n, CodeArtifact, Kind, ValidationError};
use tracing::{info, warn};

/// Produces deterministic source text and call expressions.
///
/// Output depends only on `(n, kind)` and the configured version. Every
/// artifact leaves here uncached; [`crate::VersionCache`] decides whether the
/// source is actually sent.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    version: String,
    server_id: Option<String>,
}

impl CodeGenerator {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            server_id: None,
        }
    }

    /// Stamp generated artifacts with the answering instance
    pub fn with_server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = Some(server_id.into());
        self
    }

    pub fn generate(&self, n: i64, kind: Kind) -> Result<CodeArtifact, ValidationError> {
        let n = validate_n(n).inspect_err(|e| warn!(%kind, "Rejected n: {}", e))?;
        Ok(self.build(n, kind))
    }

    /// Same as [`generate`](Self::generate) for `n` as it appears in a path
    pub fn generate_from_text(
        &self,
        raw_n: &str,
        kind: Kind,
    ) -> Result<CodeArtifact, ValidationError> {
        let n = parse_n(raw_n).inspect_err(|e| warn!(%kind, raw_n, "Rejected n: {}", e))?;
        Ok(self.build(n, kind))
    }

    fn build(&self, n: u32, kind: Kind) -> CodeArtifact {
        let source = kind.source_text();
        info!(%kind, n, source_len = source.len(), "Generated function source");
        CodeArtifact {
            kind,
            source_text: Some(source.to_string()),
            call_expression: kind.call_expression(n),
            version: self.version.clone(),
            cached: false,
            server: self.server_id.clone(),
        }
    }
}
