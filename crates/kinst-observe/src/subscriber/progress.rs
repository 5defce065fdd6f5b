use tokio::sync::mpsc;
use tracing::debug;

use kinst_model::ProgressEvent;

use crate::subscriber::view::log_event;

/// The single progress subscriber: drains the coordinator's channel into the log.
pub struct ProgressView {
    rx: mpsc::Receiver<ProgressEvent>,
}

impl ProgressView {
    pub fn new(rx: mpsc::Receiver<ProgressEvent>) -> Self {
        Self { rx }
    }

    pub fn name(&self) -> &'static str {
        "progress"
    }

    /// Runs until every publisher is dropped; returns the number of events seen.
    pub async fn run(mut self) -> usize {
        let mut seen = 0;
        while let Some(event) = self.rx.recv().await {
            log_event(&event);
            seen += 1;
        }
        debug!(target: "kinst.progress", subscriber = self.name(), seen, "progress channel closed");
        seen
    }
}
