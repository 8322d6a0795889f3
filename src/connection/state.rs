//! Connection status

use std::fmt;

/// Connection lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionStatus {
    /// No connection and no attempt in flight
    #[default]
    Disconnected,
    /// A connection attempt is in flight
    Connecting,
    /// Connection is established
    Connected,
    /// Transport teardown in progress
    Disconnecting,
    /// The last connection attempt failed
    Failed,
}

impl ConnectionStatus {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }

    /// A connect request from this status launches a new attempt
    pub fn can_launch(self) -> bool {
        matches!(self, Self::Disconnected | Self::Failed)
    }

    /// Whether a waiter blocked on `target` is released by this status.
    ///
    /// `Failed` releases every waiter. A waiter is also released once the
    /// transition toward `target` is no longer in progress, so a status
    /// passed through between two checks cannot strand it.
    pub fn releases(self, target: ConnectionStatus) -> bool {
        if self == target || self == Self::Failed {
            return true;
        }
        match target {
            Self::Connected => self != Self::Connecting,
            Self::Disconnected => self != Self::Disconnecting,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
