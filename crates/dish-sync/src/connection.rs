//! Push-channel connection state and shutdown signalling

use std::sync::Arc;
use tokio::sync::watch;

/// Lifecycle of the supervised push channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// The supervisor has not been started
    Idle,
    /// A connection attempt is in flight
    Connecting,
    /// The channel is open and delivering frames
    Open,
    /// The channel closed; the next attempt is scheduled
    ClosedPendingRetry,
    /// Shut down; no further attempts will be made
    Stopped,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Idle => write!(f, "idle"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Open => write!(f, "open"),
            ConnectionState::ClosedPendingRetry => write!(f, "closed-pending-retry"),
            ConnectionState::Stopped => write!(f, "stopped"),
        }
    }
}

/// One-way cancellation flag shared between the controller and its tasks
#[derive(Clone)]
pub struct ShutdownToken {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request shutdown. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_if_modified(|cancelled| {
            let changed = !*cancelled;
            *cancelled = true;
            changed
        });
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for ShutdownToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_state_display() {
        assert_eq!(ConnectionState::ClosedPendingRetry.to_string(), "closed-pending-retry");
        assert_eq!(ConnectionState::Open.to_string(), "open");
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_cancel() {
        let token = ShutdownToken::new();
        assert!(!token.is_cancelled());

        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };

        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_after_the_fact() {
        let token = ShutdownToken::new();
        token.cancel();
        token.cancel();
        tokio::time::timeout(Duration::from_millis(100), token.cancelled())
            .await
            .expect("already cancelled");
    }
}
