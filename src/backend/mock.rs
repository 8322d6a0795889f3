//! Mock backends
//!
//! Simulated providers with configurable transport latency. Useful for local
//! runs and for driving the connection state machine in tests.

use async_trait::async_trait;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use super::{Backend, QueryInput};
use crate::error::{ClientError, Result};

/// Simulated backend provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn label(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }
}

impl FromStr for Provider {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(ClientError::Config(format!("unknown backend: {other}"))),
        }
    }
}

/// In-process backend that sleeps instead of doing network I/O
#[derive(Debug)]
pub struct MockBackend {
    provider: Provider,
    connect_delay: Duration,
    disconnect_delay: Duration,
    fail_connect: AtomicBool,
    fail_disconnect: AtomicBool,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl MockBackend {
    /// Create a mock with one second of connect and disconnect latency
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            connect_delay: Duration::from_secs(1),
            disconnect_delay: Duration::from_secs(1),
            fail_connect: AtomicBool::new(false),
            fail_disconnect: AtomicBool::new(false),
            connect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    pub fn with_disconnect_delay(mut self, delay: Duration) -> Self {
        self.disconnect_delay = delay;
        self
    }

    /// Make every subsequent connect action fail
    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent disconnect action fail
    pub fn set_fail_disconnect(&self, fail: bool) {
        self.fail_disconnect.store(fail, Ordering::SeqCst);
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Number of transport connect actions started
    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    /// Number of transport disconnect actions started
    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> &str {
        self.provider.label()
    }

    async fn perform_connect(&self) -> Result<()> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        info!(backend = self.name(), "Connecting to backend");
        tokio::time::sleep(self.connect_delay).await;

        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(ClientError::transport(
                "perform_connect",
                format!("{} refused the connection", self.name()),
            ));
        }

        info!(backend = self.name(), "Connected to backend");
        Ok(())
    }

    async fn perform_disconnect(&self) -> Result<()> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        info!(backend = self.name(), "Disconnecting from backend");
        tokio::time::sleep(self.disconnect_delay).await;

        if self.fail_disconnect.load(Ordering::SeqCst) {
            return Err(ClientError::transport(
                "perform_disconnect",
                format!("{} did not acknowledge the disconnect", self.name()),
            ));
        }

        info!(backend = self.name(), "Disconnected from backend");
        Ok(())
    }

    async fn query(&self, input: &QueryInput) -> Result<String> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        debug!(backend = self.name(), query = %input, "Querying backend");
        Ok(format!(
            "This is a mock response, based on the query: {}",
            input
        ))
    }
}
