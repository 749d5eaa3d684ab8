//! Holder of the snapshot currently shown on the map.

use shared::Snapshot;
use std::sync::Arc;
use tokio::sync::watch;

/// A published snapshot and the tick sequence that produced it.
#[derive(Debug, Clone)]
pub struct Frame {
    pub sequence: u64,
    pub snapshot: Arc<Snapshot>,
}

/// Renderers subscribe and always see a whole frame; a publish swaps the
/// frame in one step.
#[derive(Debug)]
pub struct SnapshotStore {
    tx: watch::Sender<Option<Frame>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Replaces the current frame unless it already holds the same or a newer sequence.
    ///
    /// Returns whether the frame was applied.
    pub fn publish(&self, sequence: u64, snapshot: Snapshot) -> bool {
        self.tx.send_if_modified(|current| {
            if matches!(current, Some(frame) if frame.sequence >= sequence) {
                return false;
            }
            *current = Some(Frame {
                sequence,
                snapshot: Arc::new(snapshot),
            });
            true
        })
    }

    pub fn current(&self) -> Option<Frame> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Frame>> {
        self.tx.subscribe()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
