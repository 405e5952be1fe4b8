//! Client-owned store of source text keyed by `(kind, version)`

use codemig_common::Kind;
use std::collections::HashMap;
use tracing::debug;

/// Source text the client has received, keyed by kind and server version.
///
/// The cache is owned by the caller and passed to the executor explicitly.
/// A lookup miss is never papered over; the executor turns it into a
/// protocol error.
#[derive(Debug, Clone, Default)]
pub struct SourceCache {
    entries: HashMap<(Kind, String), String>,
    latest: HashMap<Kind, String>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retain source for `(kind, version)` and mark that version as the
    /// newest one seen for the kind.
    ///
    /// Returns false without storing anything when `version` is empty, since
    /// an unversioned response can never be matched later.
    pub fn store(&mut self, kind: Kind, version: &str, source: impl Into<String>) -> bool {
        if version.is_empty() {
            return false;
        }
        debug!(%kind, version, "Caching source text");
        self.entries
            .insert((kind, version.to_string()), source.into());
        self.latest.insert(kind, version.to_string());
        true
    }

    pub fn get(&self, kind: Kind, version: &str) -> Option<&str> {
        self.entries
            .get(&(kind, version.to_string()))
            .map(String::as_str)
    }

    /// Version to declare as `client_version` on the next request for `kind`
    pub fn latest_version(&self, kind: Kind) -> Option<&str> {
        self.latest.get(&kind).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.latest.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
