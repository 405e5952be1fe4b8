//! JSON bodies exchanged over HTTP

use serde::{Deserialize, Serialize};

/// Query parameter a client uses to declare the source version it holds
pub const CLIENT_VERSION_PARAM: &str = "client_version";

/// Query string of `GET /{kind}/{n}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeQuery {
    #[serde(default)]
    pub client_version: Option<String>,
}

/// Body of a successful `GET /{kind}/{n}`.
///
/// `code` is omitted when the client already holds the current version.
/// Older servers may leave out `server`, `version` and `cached`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub call: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
}

/// Body of every non-2xx response produced by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "message")]
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub server: String,
    pub version: String,
}
