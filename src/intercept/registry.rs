//! Fallback registry
//!
//! Maps failure categories to recovery actions. Built once when a client is
//! constructed and read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ErrorKind, Result};

/// Zero-argument recovery action. Returning `Err` escalates the failure.
pub type Fallback = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// Fallback actions keyed by failure category
#[derive(Clone, Default)]
pub struct ErrorFallbackRegistry {
    fallbacks: HashMap<ErrorKind, Fallback>,
}

impl ErrorFallbackRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fallback for a failure category, replacing any previous one
    pub fn with_fallback<F>(mut self, kind: ErrorKind, fallback: F) -> Self
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        self.fallbacks.insert(kind, Arc::new(fallback));
        self
    }

    /// Look up the fallback for a category
    pub fn get(&self, kind: ErrorKind) -> Option<&Fallback> {
        self.fallbacks.get(&kind)
    }

    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.fallbacks.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.fallbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

impl fmt::Debug for ErrorFallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.fallbacks.keys()).finish()
    }
}
