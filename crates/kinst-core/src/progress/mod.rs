use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{trace, warn};

use kinst_model::ProgressEvent;

/// Queue depth of the progress channel.
///
/// A batch publishes exactly two events per unit (`Started`, `Finished`), so any batch of up
/// to 1024 units fits without a drop even if the subscriber reads nothing until the end.
pub const DEFAULT_CAPACITY: usize = 2048;

/// Capacity that holds every event of a `batch`-unit run without dropping.
pub fn capacity_for(batch: usize) -> usize {
    batch.saturating_mul(2).max(DEFAULT_CAPACITY)
}

/// Publisher half of the single progress channel.
///
/// Publishing never blocks: events are dropped with a warning when the subscriber falls behind.
#[derive(Clone, Debug, Default)]
pub struct ProgressTx {
    tx: Option<mpsc::Sender<ProgressEvent>>,
}

/// Create a connected publisher/subscriber pair.
pub fn channel(capacity: usize) -> (ProgressTx, mpsc::Receiver<ProgressEvent>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ProgressTx { tx: Some(tx) }, rx)
}

impl ProgressTx {
    /// Publisher that discards everything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn publish(&self, event: ProgressEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(target: "kinst.core.progress", unit = event.unit(), "progress event dropped (subscriber queue full)");
            }
            Err(TrySendError::Closed(event)) => {
                trace!(target: "kinst.core.progress", unit = event.unit(), "progress subscriber gone");
            }
        }
    }
}
