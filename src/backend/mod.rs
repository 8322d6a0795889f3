//! Backend transport seam
//!
//! A backend supplies the transport-level connect/disconnect actions the
//! connection manager drives, plus the query exchange itself.

mod mock;
mod query;

pub use mock::{MockBackend, Provider};
pub use query::{QueryInput, MIN_QUERY_LEN};

use async_trait::async_trait;

use crate::error::Result;

/// Language-model backend
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Human-readable backend name for logs
    fn name(&self) -> &str;

    /// Establish the transport connection
    async fn perform_connect(&self) -> Result<()>;

    /// Tear down the transport connection
    async fn perform_disconnect(&self) -> Result<()>;

    /// Send a query and return the backend's response.
    ///
    /// Callers only issue queries on a connected client.
    async fn query(&self, input: &QueryInput) -> Result<String>;
}
