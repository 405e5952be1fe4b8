use anyhow::Result;
use clap::{Parser, Subcommand};
use codemig_client::commands;
use codemig_client::config::{parse_timeout, ClientConfig};
use codemig_common::Kind;
use codemig_sandbox::{OutputSink, StdoutSink};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "codemig")]
#[command(about = "Fetch, evaluate and record codemig artifacts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Server base URL
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    /// Request timeout, e.g. 5s or 500ms
    #[arg(short, long, global = true, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one or more fetch/evaluate cycles
    Run {
        /// count (alias nau) or fibonacci (alias fib)
        #[arg(short, long)]
        kind: Kind,

        /// Parameter, 0 to 10000
        #[arg(short, long, allow_negative_numbers = true)]
        n: i64,

        /// Number of cycles; later cycles reuse the cached source
        #[arg(short, long, default_value_t = 1)]
        repeat: usize,

        /// Print only the final line of each cycle
        #[arg(long)]
        no_echo: bool,
    },
    /// Check that the server is up
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "codemig_client={},codemig_sandbox={}",
                    log_level, log_level
                ))
            }),
        )
        .init();

    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }

    match cli.command {
        Commands::Run {
            kind,
            n,
            repeat,
            no_echo,
        } => {
            if no_echo {
                config.echo = false;
            }
            let history = commands::execute_run(&config, kind, n, repeat).await?;
            let mut out = StdoutSink;
            out.emit("");
            out.emit(&format!(
                "--- History ({} cycles, most recent first) ---",
                history.len()
            ));
            for record in &history {
                out.emit(&commands::summary_line(record));
            }
            Ok(())
        }
        Commands::Health => {
            let health = commands::execute_health(&config).await?;
            StdoutSink.emit(&format!(
                "{} server={} version={} timestamp={}",
                health.status, health.server, health.version, health.timestamp
            ));
            Ok(())
        }
    }
}
