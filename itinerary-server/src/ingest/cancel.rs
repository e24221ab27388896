//! Cooperative cancellation shared by ingest jobs and the server.

use std::sync::Arc;

use tokio::sync::watch;

/// A one-way switch that many tasks can watch.
///
/// Clones share state. Once cancelled it stays cancelled.
#[derive(Debug, Clone)]
pub struct Cancellation {
    sender: Arc<watch::Sender<bool>>,
}

impl Cancellation {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Flip the switch. Calling it again does nothing.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Non-blocking check, for use between units of blocking work.
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolve once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives as long as `self`, so this only ends on cancel.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}
