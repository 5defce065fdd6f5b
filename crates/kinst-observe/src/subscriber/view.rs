use std::borrow::Borrow;

use tracing::{info, warn};

use kinst_model::{ProgressEvent, TaskStatus};

/// Read-only accessors over a progress event.
pub trait View {
    fn as_unit(&self) -> &str;
    fn status(&self) -> Option<TaskStatus>;
    fn completed(&self) -> usize;
    fn total(&self) -> usize;
}

impl<T> View for T
where
    T: Borrow<ProgressEvent>,
{
    #[inline]
    fn as_unit(&self) -> &str {
        self.borrow().unit()
    }
    #[inline]
    fn status(&self) -> Option<TaskStatus> {
        match self.borrow() {
            ProgressEvent::Finished { status, .. } => Some(*status),
            ProgressEvent::Started { .. } => None,
        }
    }
    #[inline]
    fn completed(&self) -> usize {
        match self.borrow() {
            ProgressEvent::Finished { completed, .. } => *completed,
            ProgressEvent::Started { .. } => 0,
        }
    }
    #[inline]
    fn total(&self) -> usize {
        match self.borrow() {
            ProgressEvent::Finished { total, .. } => *total,
            ProgressEvent::Started { .. } => 0,
        }
    }
}

/// Human line for one event.
pub fn render<E: View>(e: &E) -> String {
    match e.status() {
        None => format!("Start installing {}", e.as_unit()),
        Some(status) => format!(
            "task {} status is {}  ({}/{})",
            e.as_unit(),
            status,
            e.completed(),
            e.total()
        ),
    }
}

#[inline]
pub fn log_event<E: View>(e: E) {
    let line = render(&e);
    match e.status() {
        Some(TaskStatus::Failed) => warn!(target: "kinst.progress", unit = e.as_unit(), "{line}"),
        _ => info!(target: "kinst.progress", unit = e.as_unit(), "{line}"),
    }
}
