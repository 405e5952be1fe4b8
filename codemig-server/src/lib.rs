//! codemig server
//!
//! Generates versioned function source for a closed set of kinds and serves
//! it over HTTP, omitting the source when the client already holds the
//! current version.

pub mod config;
pub mod generator;
pub mod http_server;
pub mod request_log;
pub mod version_cache;

pub use config::{ConfigError, ServerConfig};
pub use generator::CodeGenerator;
pub use http_server::{build_app, create_router, cors_layer, run, serve, ApiError, AppState};
pub use version_cache::{decide, VersionCache};
