//! Background data loading
//!
//! Loads run as spawned tokio tasks and report back over a channel, so the
//! terminal keeps drawing the loading state while a request is in flight.

use tokio::sync::mpsc;

use crate::cache::AssetCache;
use crate::data::AssetRecord;

/// Why a load was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// First load on startup; served from cache when fresh
    Initial,
    /// User-requested; bypasses the cache
    Manual,
}

/// Messages sent from a load task to the main app
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshMessage {
    /// Load succeeded with the full upstream list
    Completed {
        kind: LoadKind,
        records: Vec<AssetRecord>,
    },
    /// Load failed; carries the user-facing message
    Failed { kind: LoadKind, message: String },
}

/// Handle for starting loads and receiving their results
pub struct RefreshHandle {
    sender: mpsc::Sender<RefreshMessage>,
    receiver: mpsc::Receiver<RefreshMessage>,
}

impl Default for RefreshHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshHandle {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self { sender, receiver }
    }

    /// Spawns a load task against `cache`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, cache: AssetCache, kind: LoadKind) {
        let tx = self.sender.clone();
        tokio::spawn(async move {
            let result = match kind {
                LoadKind::Initial => cache.get().await,
                LoadKind::Manual => cache.refresh().await,
            };
            let message = match result {
                Ok(records) => RefreshMessage::Completed { kind, records },
                Err(err) => RefreshMessage::Failed {
                    kind,
                    message: err.user_message().to_string(),
                },
            };
            let _ = tx.send(message).await;
        });
    }

    /// Waits for the next load result
    pub async fn recv(&mut self) -> Option<RefreshMessage> {
        self.receiver.recv().await
    }

    /// Checks for a pending load result without blocking
    pub fn try_recv(&mut self) -> Option<RefreshMessage> {
        self.receiver.try_recv().ok()
    }
}
