//! Shutdown coordination for the relay.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Cloning shares the same channel, so the signal task and the server can
/// each hold one.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve when `rx` sees a trigger or every sender is gone.
pub async fn wait(mut rx: broadcast::Receiver<()>) {
    let _ = rx.recv().await;
}
