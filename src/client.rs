//! Client facade
//!
//! Combines the connection manager with the error interceptor. Every public
//! operation runs under interception, so failures end up logged and handed to
//! the registered fallbacks instead of reaching the caller. Connection attempts
//! are intercepted by the manager itself, once per attempt.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::{Backend, MockBackend, QueryInput};
use crate::config::{ClientConfig, PollingConfig};
use crate::connection::{ConnectionManager, ConnectionStatus};
use crate::error::{ClientError, Result};
use crate::intercept::{ErrorFallbackRegistry, ErrorInterceptor};
use crate::metrics::MetricsSnapshot;

/// Language-model client with a managed connection
pub struct LlmClient<B: Backend> {
    manager: ConnectionManager<B>,
    interceptor: Arc<ErrorInterceptor>,
}

impl<B: Backend> LlmClient<B> {
    /// Create a client. The registry is frozen from here on.
    pub fn new(backend: B, polling: PollingConfig, registry: ErrorFallbackRegistry) -> Self {
        let interceptor = Arc::new(ErrorInterceptor::new(registry));
        Self {
            manager: ConnectionManager::with_interceptor(backend, polling, Arc::clone(&interceptor)),
            interceptor,
        }
    }

    /// Connect to the backend.
    ///
    /// A failed attempt is absorbed; check [`status`](Self::status) afterwards.
    /// `Err` only carries a failure escalated by a fallback.
    pub async fn connect(&self) -> Result<()> {
        self.manager.connect().await
    }

    /// Connect, giving up the wait after `timeout`.
    ///
    /// An expired wait is intercepted as a `Transport` failure of this call;
    /// the attempt itself keeps running.
    pub async fn connect_timeout(&self, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.manager.connect()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(?timeout, "Connection wait timed out");
                let err = ClientError::transport("connect", format!("timed out after {:?}", timeout));
                self.interceptor.handle_failure("connect", &err)
            }
        }
    }

    /// Disconnect from the backend, with the same failure contract as
    /// [`connect`](Self::connect)
    pub async fn disconnect(&self) -> Result<()> {
        self.interceptor
            .wrap_async("disconnect", self.manager.disconnect())
            .await
            .map(drop)
    }

    /// Send a query to the backend.
    ///
    /// Returns `Ok(None)` when the query failed and the failure was absorbed.
    pub async fn query_service(&self, request: &str) -> Result<Option<String>> {
        self.interceptor
            .wrap_async("query_service", async {
                if !self.status().is_connected() {
                    return Err(ClientError::NotConnected);
                }
                let input = QueryInput::new(request)?;
                debug!(backend = self.backend().name(), "Sending query");
                self.backend().query(&input).await
            })
            .await
    }

    pub fn status(&self) -> ConnectionStatus {
        self.manager.status()
    }

    pub fn backend(&self) -> &B {
        self.manager.backend()
    }

    /// Replace the polling interval for future waits
    pub fn configure(&self, polling: PollingConfig) {
        debug!(interval = ?polling.polling_interval(), "Configuring client");
        self.manager.set_polling(polling);
    }

    pub fn interceptor(&self) -> &ErrorInterceptor {
        &self.interceptor
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.manager.metrics()
    }
}

impl LlmClient<MockBackend> {
    /// Build a client for the configured mock provider
    pub fn from_config(config: &ClientConfig, registry: ErrorFallbackRegistry) -> Result<Self> {
        let backend = MockBackend::new(config.provider()?)
            .with_connect_delay(Duration::from_millis(config.connect_delay_ms))
            .with_disconnect_delay(Duration::from_millis(config.disconnect_delay_ms));

        Ok(Self::new(backend, config.polling()?, registry))
    }
}
