//! Request cancellation
//!
//! A [`CancellationHandle`] travels with a request. The message layer only
//! carries it; whoever waits for the reply (see [`crate::exchange`]) stops
//! waiting once it fires.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

/// Cancellation signal that can be cloned and shared across tasks
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    sender: broadcast::Sender<()>,
    cancelled: Arc<AtomicBool>,
}

impl CancellationHandle {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            sender,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fire the signal. Only the first call has an effect.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            debug!("Cancellation requested");
            let _ = self.sender.send(());
        }
    }

    /// Resolves once the handle is cancelled, immediately if it already is.
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        if self.is_cancelled() {
            return;
        }
        let _ = receiver.recv().await;
    }
}

impl Default for CancellationHandle {
    fn default() -> Self {
        Self::new()
    }
}
