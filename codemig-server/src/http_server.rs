//! HTTP surface of the server
//!
//! `GET /{kind}/{n}?client_version=V` returns a (possibly cached) artifact,
//! `GET /health` reports liveness for a load balancer.

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use codemig_common::{
    CodeQuery, CodeResponse, ErrorBody, HealthResponse, Kind, UnknownKind, ValidationError,
};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::generator::CodeGenerator;
use crate::request_log::log_requests;
use crate::version_cache::VersionCache;

/// Immutable state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    generator: Arc<CodeGenerator>,
    versions: Arc<VersionCache>,
    server_id: Arc<str>,
}

impl AppState {
    pub fn new(server_id: impl Into<String>, code_version: impl Into<String>) -> Self {
        let server_id: String = server_id.into();
        let code_version: String = code_version.into();
        Self {
            generator: Arc::new(
                CodeGenerator::new(code_version.clone()).with_server_id(server_id.clone()),
            ),
            versions: Arc::new(VersionCache::new(code_version)),
            server_id: server_id.into(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.server_id.clone(), config.code_version.clone())
    }
}

/// Errors a handler can answer with. Each renders as `{ "error": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    UnknownKind(#[from] UnknownKind),

    #[error("No route for {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownKind(_) | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// Routes only, no CORS or logging layers
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/:kind/:n", get(get_code))
        .fallback(not_found)
        .with_state(state)
}

/// Full application: routes, CORS and request logging
pub fn build_app(config: &ServerConfig) -> Result<Router> {
    let cors = cors_layer(&config.cors_origin)?;
    Ok(create_router(AppState::from_config(config))
        .layer(cors)
        .layer(middleware::from_fn(log_requests)))
}

pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods([Method::GET, Method::HEAD]);
    if origin.trim() == "*" {
        return Ok(layer.allow_origin(Any));
    }
    let origin = HeaderValue::from_str(origin.trim())
        .with_context(|| format!("Invalid CORS origin '{}'", origin))?;
    Ok(layer.allow_origin(AllowOrigin::exact(origin)))
}

/// Serve `app` on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: tokio::net::TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_addr = listener
        .local_addr()
        .context("Failed to obtain server bind address")?;
    info!("Starting codemig server on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("codemig server error")?;

    info!("codemig server stopped");
    Ok(())
}

/// Bind according to `config` and serve until Ctrl-C
pub async fn run(config: ServerConfig) -> Result<()> {
    let app = build_app(&config)?;
    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!(
        server_id = %config.server_id,
        code_version = %config.code_version,
        cors_origin = %config.cors_origin,
        "Configuration loaded"
    );
    serve(listener, app, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    debug!(server_id = %state.server_id, "Health check");
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().timestamp_millis(),
        server: state.server_id.to_string(),
        version: state.versions.server_version().to_string(),
    })
}

async fn get_code(
    State(state): State<AppState>,
    Path((kind, n)): Path<(String, String)>,
    Query(query): Query<CodeQuery>,
) -> Result<Json<CodeResponse>, ApiError> {
    let kind: Kind = kind.parse()?;
    let artifact = state.generator.generate_from_text(&n, kind)?;
    let artifact = state
        .versions
        .negotiate(artifact, query.client_version.as_deref());

    info!(
        %kind,
        n = %n,
        cached = artifact.cached,
        server_id = %state.server_id,
        "Response sent"
    );
    Ok(Json(artifact.into_response()))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
