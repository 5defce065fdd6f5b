use crate::{Ident, TaskStatus};

/// Progress observation published by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A batch unit was handed to the launcher.
    Started { unit: Ident },
    /// A unit reached a terminal state; `completed` counts it.
    Finished {
        unit: Ident,
        status: TaskStatus,
        completed: usize,
        total: usize,
    },
}

impl ProgressEvent {
    pub fn unit(&self) -> &str {
        match self {
            ProgressEvent::Started { unit } | ProgressEvent::Finished { unit, .. } => unit,
        }
    }
}
