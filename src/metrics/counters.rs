//! Atomic counters for client lifecycle and interception
//!
//! Lock-free counters shared by the connection manager and the interceptor.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-client atomic counters
#[derive(Debug, Default)]
pub struct ClientMetrics {
    // Connection metrics
    pub connect_attempts: AtomicU64,
    pub connections_established: AtomicU64,
    pub connect_failures: AtomicU64,
    pub disconnects: AtomicU64,
    pub status_polls: AtomicU64,

    // Interception metrics
    pub failures_intercepted: AtomicU64,
    pub fallbacks_invoked: AtomicU64,
    pub escalations: AtomicU64,
}

impl ClientMetrics {
    pub const fn new() -> Self {
        Self {
            connect_attempts: AtomicU64::new(0),
            connections_established: AtomicU64::new(0),
            connect_failures: AtomicU64::new(0),
            disconnects: AtomicU64::new(0),
            status_polls: AtomicU64::new(0),
            failures_intercepted: AtomicU64::new(0),
            fallbacks_invoked: AtomicU64::new(0),
            escalations: AtomicU64::new(0),
        }
    }

    // Connection tracking
    #[inline]
    pub fn attempt_launched(&self) {
        self.connect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn attempt_succeeded(&self) {
        self.connections_established.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn attempt_failed(&self) {
        self.connect_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn disconnected(&self) {
        self.disconnects.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn status_polled(&self) {
        self.status_polls.fetch_add(1, Ordering::Relaxed);
    }

    // Interception tracking
    #[inline]
    pub fn failure_intercepted(&self) {
        self.failures_intercepted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn fallback_invoked(&self) {
        self.fallbacks_invoked.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn escalated(&self) {
        self.escalations.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connect_attempts: self.connect_attempts.load(Ordering::Relaxed),
            connections_established: self.connections_established.load(Ordering::Relaxed),
            connect_failures: self.connect_failures.load(Ordering::Relaxed),
            disconnects: self.disconnects.load(Ordering::Relaxed),
            status_polls: self.status_polls.load(Ordering::Relaxed),
            failures_intercepted: self.failures_intercepted.load(Ordering::Relaxed),
            fallbacks_invoked: self.fallbacks_invoked.load(Ordering::Relaxed),
            escalations: self.escalations.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics for reporting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub connect_attempts: u64,
    pub connections_established: u64,
    pub connect_failures: u64,
    pub disconnects: u64,
    pub status_polls: u64,
    pub failures_intercepted: u64,
    pub fallbacks_invoked: u64,
    pub escalations: u64,
}
