//! Failure interception
//!
//! Fallback registry and the interceptor that consults it.

mod interceptor;
mod registry;

pub use interceptor::ErrorInterceptor;
pub use registry::{ErrorFallbackRegistry, Fallback};
