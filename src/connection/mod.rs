//! Connection management
//!
//! Handles connection status and the lifecycle state machine.

mod manager;
mod state;

pub use manager::ConnectionManager;
pub use state::ConnectionStatus;
