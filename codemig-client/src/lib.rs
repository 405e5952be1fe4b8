//! codemig client
//!
//! Fetches artifacts from a codemig server, keeps the source of each kind
//! for the version it was received at, evaluates artifacts locally and
//! records every completed cycle.

pub mod aggregator;
pub mod commands;
pub mod config;
pub mod cycle;
pub mod history;
pub mod transport;

pub use aggregator::{combine, AggregateError, HistoryRecord};
pub use config::{ClientConfig, ConfigError};
pub use cycle::{CycleError, MigrationClient};
pub use history::History;
pub use transport::{HttpTransport, Transport, TransportError, DEFAULT_TIMEOUT};
