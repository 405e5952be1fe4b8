//! Transport between the client and a codemig server

use async_trait::async_trait;
use codemig_common::{
    CodeArtifact, CodeResponse, ErrorBody, ExecutionRequest, HealthResponse, CLIENT_VERSION_PARAM,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Default bound on a single request, connect and body included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a request did not produce an artifact
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Server unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Server unavailable (HTTP {status})")]
    Unavailable { status: u16 },

    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Whether retrying the whole cycle may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Timeout(_)
            | TransportError::Unreachable { .. }
            | TransportError::Unavailable { .. } => true,
            TransportError::Rejected { status, .. } => *status >= 500,
            TransportError::Decode(_) => false,
        }
    }
}

/// Request/response channel to a server
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the artifact for `request`, sending its client version if any
    async fn fetch(&self, request: &ExecutionRequest) -> Result<CodeArtifact, TransportError>;

    /// Query the server's health endpoint
    async fn health(&self) -> Result<HealthResponse, TransportError>;
}

/// [`Transport`] over HTTP with a per-request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TransportError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(url, e))?;

        if matches!(status, StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE) {
            warn!(url, status = status.as_u16(), "Server unavailable");
            return Err(TransportError::Unavailable {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| rejection_text(status, &body));
            warn!(url, status = status.as_u16(), %message, "Request rejected");
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    fn classify(&self, url: &str, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if error.is_decode() {
            TransportError::Decode(error.to_string())
        } else {
            TransportError::Unreachable {
                url: url.to_string(),
                reason: error.to_string(),
            }
        }
    }
}

fn rejection_text(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, request: &ExecutionRequest) -> Result<CodeArtifact, TransportError> {
        let url = format!("{}/{}/{}", self.base_url, request.kind(), request.n());
        let query: Vec<(&str, &str)> = request
            .client_version()
            .map(|version| (CLIENT_VERSION_PARAM, version))
            .into_iter()
            .collect();

        debug!(%url, client_version = ?request.client_version(), "Fetching artifact");
        let response: CodeResponse = self.get_json(&url, &query).await?;
        let artifact = CodeArtifact::from_response(request.kind(), response);
        debug!(
            kind = %artifact.kind,
            version = %artifact.version,
            cached = artifact.cached,
            server = ?artifact.server,
            "Artifact received"
        );
        Ok(artifact)
    }

    async fn health(&self) -> Result<HealthResponse, TransportError> {
        let url = format!("{}/health", self.base_url);
        self.get_json(&url, &[]).await
    }
}
