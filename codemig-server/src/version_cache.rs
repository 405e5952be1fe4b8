//! Version negotiation: whether a response needs to carry source text

use codemig_common::CodeArtifact;
use tracing::debug;

/// True when the source must be sent.
///
/// Exact string comparison. An absent or empty client version never matches.
pub fn decide(client_version: Option<&str>, server_version: &str) -> bool {
    match client_version {
        Some(version) if !version.is_empty() => version != server_version,
        _ => true,
    }
}

/// Applies [`decide`] against the server's current version.
///
/// Source text depends only on kind and version, so a client that already
/// holds the current version only needs the call expression. Bumping the
/// version invalidates every client copy regardless of kind.
#[derive(Debug, Clone)]
pub struct VersionCache {
    server_version: String,
}

impl VersionCache {
    pub fn new(server_version: impl Into<String>) -> Self {
        Self {
            server_version: server_version.into(),
        }
    }

    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    pub fn include_source(&self, client_version: Option<&str>) -> bool {
        decide(client_version, &self.server_version)
    }

    /// Strip the source from an artifact when the client already has it
    pub fn negotiate(&self, mut artifact: CodeArtifact, client_version: Option<&str>) -> CodeArtifact {
        let include = self.include_source(client_version);
        debug!(
            kind = %artifact.kind,
            client_version = client_version.unwrap_or("<none>"),
            server_version = %self.server_version,
            include_source = include,
            "Version negotiation"
        );
        artifact.cached = !include;
        if !include {
            artifact.source_text = None;
        }
        artifact
    }
}
