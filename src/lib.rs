//! LLMLink - language-model backend client
//!
//! Client abstraction over a language-model backend with a managed connection
//! lifecycle. Concurrent connect requests share a single in-flight attempt,
//! and operation failures are routed to pluggable fallbacks by category.

pub mod backend;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod intercept;
pub mod metrics;
pub mod util;

pub use client::LlmClient;
pub use config::Config;
pub use connection::ConnectionStatus;
pub use error::{ClientError, ErrorKind, Result};

/// Client version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
