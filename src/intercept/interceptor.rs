//! Error interceptor
//!
//! Wraps blocking and suspending operations so that a failure is logged and
//! routed to the fallback registered for its category instead of reaching the
//! caller. Both adapters share [`ErrorInterceptor::handle_failure`].

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::registry::ErrorFallbackRegistry;
use crate::error::{ClientError, Result};
use crate::metrics::ClientMetrics;

/// Routes operation failures to registered fallbacks
#[derive(Debug)]
pub struct ErrorInterceptor {
    registry: Arc<ErrorFallbackRegistry>,
    metrics: Arc<ClientMetrics>,
}

impl ErrorInterceptor {
    /// Create an interceptor with its own counters
    pub fn new(registry: ErrorFallbackRegistry) -> Self {
        Self::with_metrics(registry, Arc::new(ClientMetrics::new()))
    }

    /// Create an interceptor reporting into shared counters
    pub fn with_metrics(registry: ErrorFallbackRegistry, metrics: Arc<ClientMetrics>) -> Self {
        Self {
            registry: Arc::new(registry),
            metrics,
        }
    }

    pub fn registry(&self) -> &ErrorFallbackRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &ClientMetrics {
        &self.metrics
    }

    /// Handle to the counters this interceptor reports into
    pub fn shared_metrics(&self) -> Arc<ClientMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run a blocking operation under interception.
    ///
    /// Returns `Ok(Some(value))` on success and `Ok(None)` when the failure was
    /// absorbed. `Err` only carries a failure raised by a fallback.
    pub fn wrap_sync<T, F>(&self, operation: &str, f: F) -> Result<Option<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        match f() {
            Ok(value) => Ok(Some(value)),
            Err(e) => self.handle_failure(operation, &e).map(|()| None),
        }
    }

    /// Run a suspending operation under interception.
    ///
    /// Same contract as [`wrap_sync`](Self::wrap_sync). The only suspension
    /// point is the wrapped future itself.
    pub async fn wrap_async<T, Fut>(&self, operation: &str, fut: Fut) -> Result<Option<T>>
    where
        Fut: Future<Output = Result<T>>,
    {
        match fut.await {
            Ok(value) => Ok(Some(value)),
            Err(e) => self.handle_failure(operation, &e).map(|()| None),
        }
    }

    /// Log a failure and run the fallback registered for its kind
    pub fn handle_failure(&self, operation: &str, err: &ClientError) -> Result<()> {
        self.metrics.failure_intercepted();

        let kind = err.kind();
        error!(operation, kind = %kind, error = %err, "Operation failed");

        let Some(fallback) = self.registry.get(kind) else {
            debug!(operation, kind = %kind, "No fallback registered");
            return Ok(());
        };

        self.metrics.fallback_invoked();
        debug!(operation, kind = %kind, "Invoking fallback");

        // Not intercepted again: a fallback error is the escalation path.
        if let Err(escalation) = fallback() {
            self.metrics.escalated();
            warn!(operation, kind = %kind, error = %escalation, "Fallback escalated failure");
            return Err(escalation);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_fallback(counter: &Arc<AtomicUsize>) -> impl Fn() -> Result<()> + Send + Sync {
        let counter = counter.clone();
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_success_passes_value_through() {
        let interceptor = ErrorInterceptor::new(ErrorFallbackRegistry::new());

        assert_eq!(interceptor.wrap_sync("answer", || Ok(42)), Ok(Some(42)));
        assert_eq!(interceptor.wrap_sync("unit", || Ok(())), Ok(Some(())));
        assert_eq!(interceptor.metrics().snapshot().failures_intercepted, 0);
    }

    #[test]
    fn test_failure_without_fallback_is_swallowed() {
        let interceptor = ErrorInterceptor::new(ErrorFallbackRegistry::new());

        let result: Result<Option<u32>> =
            interceptor.wrap_sync("query", || Err(ClientError::backend("overloaded")));

        assert_eq!(result, Ok(None));
        let snapshot = interceptor.metrics().snapshot();
        assert_eq!(snapshot.failures_intercepted, 1);
        assert_eq!(snapshot.fallbacks_invoked, 0);
    }

    #[test]
    fn test_fallback_invoked_once_for_matching_kind() {
        let hits = Arc::new(AtomicUsize::new(0));
        let misses = Arc::new(AtomicUsize::new(0));
        let registry = ErrorFallbackRegistry::new()
            .with_fallback(ErrorKind::Transport, counting_fallback(&hits))
            .with_fallback(ErrorKind::Backend, counting_fallback(&misses));
        let interceptor = ErrorInterceptor::new(registry);

        let result: Result<Option<()>> = interceptor.wrap_sync("perform_connect", || {
            Err(ClientError::transport("perform_connect", "refused"))
        });

        assert_eq!(result, Ok(None));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(misses.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fallback_escalation_propagates() {
        let registry = ErrorFallbackRegistry::new().with_fallback(ErrorKind::Transport, || {
            Err(ClientError::escalated(ErrorKind::Transport, "critical"))
        });
        let interceptor = ErrorInterceptor::new(registry);

        let result: Result<Option<()>> = interceptor
            .wrap_sync("perform_connect", || Err(ClientError::transport("perform_connect", "x")));

        assert_eq!(
            result,
            Err(ClientError::escalated(ErrorKind::Transport, "critical"))
        );
        assert_eq!(interceptor.metrics().snapshot().escalations, 1);
    }

    #[tokio::test]
    async fn test_async_adapter_matches_sync_semantics() {
        let hits = Arc::new(AtomicUsize::new(0));
        let registry =
            ErrorFallbackRegistry::new().with_fallback(ErrorKind::NotConnected, counting_fallback(&hits));
        let interceptor = ErrorInterceptor::new(registry);

        let ok = interceptor
            .wrap_async("query", async { Ok("response".to_string()) })
            .await;
        assert_eq!(ok, Ok(Some("response".to_string())));

        let swallowed: Result<Option<String>> = interceptor
            .wrap_async("query", async {
                tokio::task::yield_now().await;
                Err(ClientError::NotConnected)
            })
            .await;
        assert_eq!(swallowed, Ok(None));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_async_adapter_without_runtime() {
        let interceptor = ErrorInterceptor::new(ErrorFallbackRegistry::new());
        let result: Result<Option<u8>> = tokio_test::block_on(
            interceptor.wrap_async("query", async { Err(ClientError::NotConnected) }),
        );
        assert_eq!(result, Ok(None));
    }
}
