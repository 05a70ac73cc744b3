//! Realtime connection lifecycle
//!
//! A pure state machine; the I/O lives in [`crate::realtime`]. Closes and
//! connect failures both route through `Backoff`, and every successful
//! session after the first counts as a reconnect.

/// Where a realtime connection currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Backoff,
}

/// Tracks one connection's lifecycle and reconnect count
#[derive(Debug)]
pub struct ConnectionStateMachine {
    state: ConnectionState,
    sessions: u64,
}

impl ConnectionStateMachine {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            sessions: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Successful sessions beyond the first
    pub fn reconnects(&self) -> u64 {
        self.sessions.saturating_sub(1)
    }

    /// A connection attempt is starting
    pub fn connect_started(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    /// The attempt succeeded
    pub fn connected(&mut self) {
        self.state = ConnectionState::Connected;
        self.sessions += 1;
    }

    /// The connection closed or the attempt failed
    pub fn closed(&mut self) {
        self.state = ConnectionState::Backoff;
    }
}

impl Default for ConnectionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disconnected() {
        let machine = ConnectionStateMachine::new();
        assert_eq!(machine.state(), ConnectionState::Disconnected);
        assert_eq!(machine.reconnects(), 0);
    }

    #[test]
    fn test_first_session_is_not_a_reconnect() {
        let mut machine = ConnectionStateMachine::new();
        machine.connect_started();
        assert_eq!(machine.state(), ConnectionState::Connecting);
        machine.connected();
        assert_eq!(machine.state(), ConnectionState::Connected);
        assert_eq!(machine.reconnects(), 0);
    }

    #[test]
    fn test_close_and_reconnect_cycle() {
        let mut machine = ConnectionStateMachine::new();
        machine.connect_started();
        machine.connected();

        machine.closed();
        assert_eq!(machine.state(), ConnectionState::Backoff);

        machine.connect_started();
        machine.connected();
        assert_eq!(machine.reconnects(), 1);

        machine.closed();
        machine.connect_started();
        machine.connected();
        assert_eq!(machine.reconnects(), 2);
    }

    #[test]
    fn test_failed_attempt_routes_through_backoff() {
        let mut machine = ConnectionStateMachine::new();
        machine.connect_started();
        machine.closed();
        assert_eq!(machine.state(), ConnectionState::Backoff);
        assert_eq!(machine.reconnects(), 0);
    }
}
