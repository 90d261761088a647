/**
 * Reconnection Controller
 *
 * Pure state machine deciding what the client does after each connection
 * lifecycle event. It performs no I/O; the driver in
 * [`crate::client::connection`] executes the returned actions.
 *
 * ```text
 * Idle ──ConnectRequested──▶ Connecting ──Opened──▶ Open
 *                               │                     │
 *                         ConnectFailed      Closed{expected: false}
 *                               ▼                     ▼
 *                          Backoff(n) ◀───────────────┘
 *                               │ RetryElapsed
 *                               ▼
 *                          Connecting ... after max attempts ──▶ Failed
 * ```
 *
 * Retries use a fixed delay. The attempt counter resets on every successful
 * open. `Disconnect` returns to `Idle` from any state without retrying, and a
 * `ConnectRequested` from `Failed` starts over.
 */

use std::time::Duration;

/// Where the client connection currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected and not trying to
    Idle,
    /// A connection attempt is in flight
    Connecting,
    /// Connected
    Open,
    /// Waiting before reconnect attempt `n` (1-based)
    Backoff(u32),
    /// Gave up after exhausting the retry budget
    Failed,
}

/// Lifecycle events fed into the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The application asked for a connection
    ConnectRequested,
    /// The socket handshake completed
    Opened,
    /// An open socket closed; `expected` when the close was requested locally
    Closed { expected: bool },
    /// The connection attempt failed
    ConnectFailed,
    /// The backoff delay has elapsed
    RetryElapsed,
    /// The application asked to disconnect
    Disconnect,
}

/// What the driver must do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectAction {
    /// Start a connection attempt
    Connect,
    /// Wait, then report `RetryElapsed`
    ScheduleRetry(Duration),
    /// Re-request state from the server (`getMessages`)
    Resync,
    /// Stop retrying and surface a persistent error
    GiveUp { attempts: u32 },
    /// Close the current socket
    Close,
    /// Nothing to do
    None,
}

/// Fixed-delay, bounded-retry reconnection state machine
#[derive(Debug, Clone)]
pub struct ReconnectController {
    state: ConnectionState,
    delay: Duration,
    max_attempts: u32,
    attempts: u32,
}

impl ReconnectController {
    /// Create an idle controller
    ///
    /// # Arguments
    ///
    /// * `delay` - Wait between reconnect attempts
    /// * `max_attempts` - Reconnect attempts after a loss before giving up
    pub fn new(delay: Duration, max_attempts: u32) -> Self {
        Self {
            state: ConnectionState::Idle,
            delay,
            max_attempts,
            attempts: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Reconnect attempts made since the last successful open
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Apply one lifecycle event
    ///
    /// # Returns
    ///
    /// The action the driver must perform. Events that do not apply to the
    /// current state leave it unchanged and return `ReconnectAction::None`.
    pub fn handle(&mut self, event: LifecycleEvent) -> ReconnectAction {
        use ConnectionState as S;
        use LifecycleEvent as E;

        match (self.state, event) {
            (S::Idle | S::Failed, E::ConnectRequested) => {
                self.attempts = 0;
                self.state = S::Connecting;
                ReconnectAction::Connect
            }
            (S::Connecting, E::Opened) => {
                self.attempts = 0;
                self.state = S::Open;
                ReconnectAction::Resync
            }
            (S::Connecting, E::ConnectFailed | E::Closed { .. }) => self.schedule_retry(),
            (S::Open, E::Closed { expected: false }) => self.schedule_retry(),
            (S::Open, E::Closed { expected: true }) => {
                self.state = S::Idle;
                ReconnectAction::None
            }
            (S::Backoff(n), E::RetryElapsed) => {
                self.attempts = n;
                self.state = S::Connecting;
                ReconnectAction::Connect
            }
            (S::Open | S::Connecting, E::Disconnect) => {
                self.state = S::Idle;
                ReconnectAction::Close
            }
            (S::Backoff(_) | S::Failed, E::Disconnect) => {
                self.state = S::Idle;
                ReconnectAction::None
            }
            _ => ReconnectAction::None,
        }
    }

    fn schedule_retry(&mut self) -> ReconnectAction {
        let next = self.attempts + 1;
        if next > self.max_attempts {
            tracing::warn!("[Client] Giving up after {} reconnect attempts", self.attempts);
            self.state = ConnectionState::Failed;
            return ReconnectAction::GiveUp {
                attempts: self.attempts,
            };
        }
        tracing::info!(
            "[Client] Reconnect attempt {}/{} in {:?}",
            next,
            self.max_attempts,
            self.delay
        );
        self.state = ConnectionState::Backoff(next);
        ReconnectAction::ScheduleRetry(self.delay)
    }
}
