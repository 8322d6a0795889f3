//! Connection manager
//!
//! Drives the connection state machine for one backend. Any number of callers
//! may request a connection concurrently; at most one attempt is in flight and
//! every caller waiting on it is released when it resolves. A failed attempt
//! goes through the interceptor once, however many callers wait on it.

use parking_lot::{Mutex, RwLock};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::state::ConnectionStatus;
use crate::backend::Backend;
use crate::config::PollingConfig;
use crate::error::{ClientError, Result};
use crate::intercept::{ErrorFallbackRegistry, ErrorInterceptor};
use crate::metrics::{ClientMetrics, MetricsSnapshot};

/// Manages the connection lifecycle of a single backend
pub struct ConnectionManager<B: Backend> {
    shared: Arc<Shared<B>>,
}

struct Shared<B: Backend> {
    backend: Arc<B>,
    /// Status and attempt handle always change together
    state: Mutex<ManagerState>,
    polling: RwLock<PollingConfig>,
    interceptor: Arc<ErrorInterceptor>,
    metrics: Arc<ClientMetrics>,
}

#[derive(Default)]
struct ManagerState {
    status: ConnectionStatus,
    /// In-flight connection attempt, if any
    attempt: Option<JoinHandle<()>>,
    /// Cause of the most recent failed attempt
    last_failure: Option<ClientError>,
    /// Failure raised by a fallback for the most recent attempt
    escalation: Option<ClientError>,
}

enum ConnectStep {
    AwaitOutcome,
    AwaitDisconnection,
}

enum DisconnectStep {
    Teardown,
    AwaitConnection,
    Done,
}

impl<B: Backend> ConnectionManager<B> {
    /// Create a manager with no fallbacks registered
    pub fn new(backend: B, polling: PollingConfig) -> Self {
        let interceptor = ErrorInterceptor::new(ErrorFallbackRegistry::new());
        Self::with_interceptor(backend, polling, Arc::new(interceptor))
    }

    /// Create a manager whose attempts fail through `interceptor`.
    ///
    /// Counters are shared with the interceptor.
    pub fn with_interceptor(
        backend: B,
        polling: PollingConfig,
        interceptor: Arc<ErrorInterceptor>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend: Arc::new(backend),
                state: Mutex::new(ManagerState::default()),
                polling: RwLock::new(polling),
                metrics: interceptor.shared_metrics(),
                interceptor,
            }),
        }
    }

    /// Current connection status
    pub fn status(&self) -> ConnectionStatus {
        self.shared.state.lock().status
    }

    /// Whether a connection attempt is in flight
    pub fn attempt_in_flight(&self) -> bool {
        self.shared.state.lock().attempt.is_some()
    }

    /// Cause of the most recent failed attempt, if the last attempt failed
    pub fn last_failure(&self) -> Option<ClientError> {
        self.shared.state.lock().last_failure.clone()
    }

    pub fn backend(&self) -> &B {
        &self.shared.backend
    }

    pub fn polling(&self) -> PollingConfig {
        *self.shared.polling.read()
    }

    /// Replace the polling settings used by subsequent wait iterations
    pub fn set_polling(&self, polling: PollingConfig) {
        *self.shared.polling.write() = polling;
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.shared.metrics.snapshot()
    }

    /// Bring the connection up.
    ///
    /// Joins an attempt already in flight instead of launching another one.
    /// Returns once the status is `Connected` or `Failed`. A failed attempt
    /// has already been intercepted, so callers read [`status`](Self::status);
    /// `Err` only carries a failure escalated by that attempt's fallback. If a
    /// concurrent disconnect tears the connection down before this caller
    /// observes it, the request is dispatched again.
    pub async fn connect(&self) -> Result<()> {
        debug!(status = %self.status(), "Initiating connection");

        loop {
            let step = {
                let mut state = self.shared.state.lock();
                match state.status {
                    ConnectionStatus::Connecting => {
                        debug!("Already connecting");
                        ConnectStep::AwaitOutcome
                    }
                    status if status.can_launch() => {
                        self.shared.transition(&mut state, ConnectionStatus::Connecting);
                        self.shared.launch_attempt(&mut state);
                        ConnectStep::AwaitOutcome
                    }
                    ConnectionStatus::Disconnecting => ConnectStep::AwaitDisconnection,
                    _ => ConnectStep::AwaitOutcome,
                }
            };

            if let ConnectStep::AwaitDisconnection = step {
                debug!("Disconnect in progress, waiting before connecting");
                self.await_status(ConnectionStatus::Disconnected).await;
                continue;
            }

            match self.await_status(ConnectionStatus::Connected).await {
                ConnectionStatus::Connected => {
                    debug!("Finished connection wait");
                    return Ok(());
                }
                ConnectionStatus::Failed => {
                    let state = self.shared.state.lock();
                    return match state.escalation.clone() {
                        Some(escalation) => Err(escalation),
                        None => Ok(()),
                    };
                }
                status => {
                    debug!(%status, "Connection released by a concurrent disconnect");
                }
            }
        }
    }

    /// [`connect`](Self::connect) bounded by a timeout.
    ///
    /// On expiry the caller stops waiting but the in-flight attempt keeps
    /// running and still settles the status.
    pub async fn connect_timeout(&self, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.connect()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(?timeout, "Connection wait timed out");
                Err(ClientError::transport(
                    "connect",
                    format!("timed out after {:?}", timeout),
                ))
            }
        }
    }

    /// Bring the connection down.
    ///
    /// Waits for an in-flight attempt first. No-op unless connected. A failed
    /// transport teardown still leaves the status `Disconnected`.
    pub async fn disconnect(&self) -> Result<()> {
        debug!(status = %self.status(), "Initiating disconnection");

        loop {
            let step = {
                let mut state = self.shared.state.lock();
                match state.status {
                    ConnectionStatus::Connected => {
                        self.shared
                            .transition(&mut state, ConnectionStatus::Disconnecting);
                        DisconnectStep::Teardown
                    }
                    ConnectionStatus::Connecting => DisconnectStep::AwaitConnection,
                    status => {
                        debug!(%status, "Nothing to disconnect");
                        DisconnectStep::Done
                    }
                }
            };

            match step {
                DisconnectStep::Teardown => break,
                DisconnectStep::AwaitConnection => {
                    debug!("Connection attempt in progress, waiting before disconnecting");
                    self.await_status(ConnectionStatus::Connected).await;
                }
                DisconnectStep::Done => return Ok(()),
            }
        }

        // Detached so the status settles even if this caller goes away
        let shared = Arc::clone(&self.shared);
        let teardown = tokio::spawn(async move {
            let backend = Arc::clone(&shared.backend);
            let outcome =
                run_transport("perform_disconnect", async move { backend.perform_disconnect().await })
                    .await;
            shared.on_disconnect_complete(&outcome);
            outcome
        });

        match teardown.await {
            Ok(outcome) => outcome,
            Err(e) => Err(ClientError::transport(
                "perform_disconnect",
                format!("teardown task aborted: {}", e),
            )),
        }
    }

    /// Suspend until the status releases a waiter on `target`, sleeping a
    /// full polling interval between checks. Returns the releasing status.
    async fn await_status(&self, target: ConnectionStatus) -> ConnectionStatus {
        let mut polls: u64 = 0;
        loop {
            let status = self.status();
            if status.releases(target) {
                debug!(awaited = %target, %status, polls, "Wait released");
                return status;
            }

            let interval = self.polling().polling_interval();
            tokio::time::sleep(interval).await;
            polls += 1;
            self.shared.metrics.status_polled();
        }
    }
}

impl<B: Backend> Clone for ConnectionManager<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<B: Backend> Shared<B> {
    fn transition(&self, state: &mut ManagerState, to: ConnectionStatus) {
        debug!(from = %state.status, %to, "Connection status changed");
        state.status = to;
    }

    /// Launch a connection attempt unless one is already in flight.
    ///
    /// Called with the state lock held, so the handle is stored before the
    /// completion observer can clear it.
    fn launch_attempt(self: &Arc<Self>, state: &mut ManagerState) {
        if state.attempt.is_some() {
            debug!("Connection attempt already in progress");
            return;
        }

        debug!(backend = self.backend.name(), "Launching connection attempt");
        self.metrics.attempt_launched();
        state.escalation = None;

        let shared = Arc::clone(self);
        state.attempt = Some(tokio::spawn(async move {
            let backend = Arc::clone(&shared.backend);
            let outcome =
                run_transport("perform_connect", async move { backend.perform_connect().await })
                    .await;
            let escalation = match &outcome {
                Ok(()) => None,
                Err(e) => shared.interceptor.handle_failure("perform_connect", e).err(),
            };
            shared.on_attempt_complete(outcome, escalation);
        }));
    }

    /// Single mutation point for attempt-driven status changes
    fn on_attempt_complete(&self, outcome: Result<()>, escalation: Option<ClientError>) {
        let mut state = self.state.lock();
        state.attempt = None;
        state.escalation = escalation;

        match outcome {
            Ok(()) => {
                self.transition(&mut state, ConnectionStatus::Connected);
                state.last_failure = None;
                self.metrics.attempt_succeeded();
                info!(backend = self.backend.name(), "Connected to the service");
            }
            Err(e) => {
                self.transition(&mut state, ConnectionStatus::Failed);
                self.metrics.attempt_failed();
                debug!(backend = self.backend.name(), error = %e, "Connection attempt failed");
                state.last_failure = Some(e);
            }
        }
    }

    fn on_disconnect_complete(&self, outcome: &Result<()>) {
        {
            let mut state = self.state.lock();
            self.transition(&mut state, ConnectionStatus::Disconnected);
        }
        self.metrics.disconnected();

        match outcome {
            Ok(()) => info!(backend = self.backend.name(), "Disconnected from the service"),
            Err(e) => warn!(
                backend = self.backend.name(),
                error = %e,
                "Transport disconnect failed, connection released"
            ),
        }
    }
}

/// Run a transport action on its own task so a panic surfaces as a failure
async fn run_transport<F>(operation: &'static str, action: F) -> Result<()>
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    match tokio::spawn(action).await {
        Ok(outcome) => outcome,
        Err(e) => Err(ClientError::transport(
            operation,
            format!("transport task aborted: {}", e),
        )),
    }
}
