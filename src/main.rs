//! LLMLink - Entry Point
//!
//! CLI for exercising a backend client against a configured mock provider.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

use llmlink::intercept::ErrorFallbackRegistry;
use llmlink::{Config, ConnectionStatus, ErrorKind, LlmClient, VERSION};

/// LLMLink - language-model client with a managed connection
#[derive(Parser)]
#[command(name = "llmlink")]
#[command(version = VERSION)]
#[command(about = "Language-model backend client with a managed connection lifecycle")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect, send one query, and disconnect
    Run {
        /// Path to configuration file
        #[arg(short, long, default_value = "llmlink.toml")]
        config: PathBuf,
        /// Query to send once connected
        #[arg(short, long)]
        query: String,
        /// Give up waiting for the connection after this many milliseconds
        #[arg(long)]
        connect_timeout_ms: Option<u64>,
    },
    /// Validate a configuration file
    CheckConfig {
        /// Path to configuration file
        #[arg(short, long, default_value = "llmlink.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            query,
            connect_timeout_ms,
        } => run_query(config, query, connect_timeout_ms).await,
        Commands::CheckConfig { config } => check_config(config),
    }
}

async fn run_query(config_path: PathBuf, query: String, connect_timeout_ms: Option<u64>) -> Result<()> {
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    llmlink::util::init_tracing(&config.logging)?;

    info!(
        version = VERSION,
        config_path = ?config_path,
        backend = %config.client.backend,
        "Starting LLMLink"
    );

    let registry = ErrorFallbackRegistry::new().with_fallback(ErrorKind::NotConnected, || {
        warn!("Query issued without a connection");
        Ok(())
    });
    let client = LlmClient::from_config(&config.client, registry)?;

    match connect_timeout_ms {
        Some(ms) => client.connect_timeout(Duration::from_millis(ms)).await?,
        None => client.connect().await?,
    }

    if client.status() != ConnectionStatus::Connected {
        error!(status = %client.status(), "Could not connect to backend");
        anyhow::bail!("connection failed with status {}", client.status());
    }

    match client.query_service(&query).await? {
        Some(response) => println!("{}", response),
        None => warn!("Query produced no response"),
    }

    client.disconnect().await?;

    let metrics = client.metrics();
    info!(
        connect_attempts = metrics.connect_attempts,
        failures_intercepted = metrics.failures_intercepted,
        "Client stopped"
    );
    Ok(())
}

fn check_config(config_path: PathBuf) -> Result<()> {
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    println!(
        "{}: ok (backend {}, polling every {} ms)",
        config_path.display(),
        config.client.backend,
        config.client.polling_interval_ms
    );
    Ok(())
}
