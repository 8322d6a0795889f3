//! Client metrics
//!
//! Atomic counters for connection lifecycle and failure interception.

mod counters;

pub use counters::*;
