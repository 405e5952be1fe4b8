//! A real codemig server on an ephemeral port

use codemig_server::{build_app, serve, ServerConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Server bound to `127.0.0.1:0`; shuts down when stopped or dropped
pub struct TestServer {
    addr: SocketAddr,
    config: ServerConfig,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<anyhow::Result<()>>>,
}

impl TestServer {
    pub async fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let app = build_app(&config)?;
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(serve(listener, app, async move {
            let _ = rx.await;
        }));

        Ok(Self {
            addr,
            config,
            shutdown: Some(tx),
            handle: Some(handle),
        })
    }

    /// Start with the given identity and code version, defaults otherwise
    pub async fn with_version(server_id: &str, code_version: &str) -> anyhow::Result<Self> {
        Self::start(ServerConfig {
            server_id: server_id.to_string(),
            code_version: code_version.to_string(),
            ..ServerConfig::default()
        })
        .await
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Shut down gracefully and wait for the serve task
    pub async fn stop(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.await?,
            None => Ok(()),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
