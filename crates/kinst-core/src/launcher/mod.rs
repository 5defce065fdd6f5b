//! Launch seam between the coordinator and whatever actually runs an install procedure.
//!
//! A [`Launcher`] starts a unit in the background and hands back a [`TaskHandle`].
//! The worker owns the matching [`TaskReporter`] and reports exactly one exit code.
use std::future::Future;

use tokio::sync::watch;
use tracing::trace;

use kinst_model::{EXIT_LOST, ExitCode, Ident, TaskStatus, UnitOfWork, UnitOutcome};

/// Starts units of work. Implementations must not block.
pub trait Launcher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Start `unit` in the background.
    ///
    /// Must be called from within a tokio runtime.
    fn launch(&self, unit: &UnitOfWork) -> TaskHandle;
}

/// Snapshot of a unit's state as seen through its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskState {
    pub status: TaskStatus,
    /// Present once the unit is terminal.
    pub exit_code: Option<ExitCode>,
}

impl TaskState {
    fn running() -> Self {
        Self {
            status: TaskStatus::Running,
            exit_code: None,
        }
    }
}

/// Live reference to a running or finished unit, owned by the coordinator that launched it.
#[derive(Debug)]
pub struct TaskHandle {
    ident: Ident,
    rx: watch::Receiver<TaskState>,
}

/// Worker side of a [`TaskHandle`].
#[derive(Debug)]
pub struct TaskReporter {
    tx: watch::Sender<TaskState>,
}

impl TaskHandle {
    /// Create a connected handle/reporter pair in the `running` state.
    pub fn pair(ident: impl Into<Ident>) -> (TaskHandle, TaskReporter) {
        let (tx, rx) = watch::channel(TaskState::running());
        (
            TaskHandle {
                ident: ident.into(),
                rx,
            },
            TaskReporter { tx },
        )
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Current state without waiting.
    pub fn state(&self) -> TaskState {
        *self.rx.borrow()
    }

    pub fn status(&self) -> TaskStatus {
        self.state().status
    }

    pub fn exit_code(&self) -> Option<ExitCode> {
        self.state().exit_code
    }

    /// Wait until the unit is terminal.
    ///
    /// A worker that drops its reporter without finishing is recorded as failed with [`EXIT_LOST`].
    pub async fn wait(mut self) -> (Ident, UnitOutcome) {
        loop {
            let code = self.rx.borrow_and_update().exit_code;
            if let Some(code) = code {
                return (self.ident, UnitOutcome::from_exit_code(code));
            }
            if self.rx.changed().await.is_err() {
                let code = self.rx.borrow().exit_code.unwrap_or(EXIT_LOST);
                trace!(target: "kinst.core.launcher", ident = %self.ident, code, "reporter dropped");
                return (self.ident, UnitOutcome::from_exit_code(code));
            }
        }
    }
}

impl TaskReporter {
    /// Publish the terminal exit code. Consumes the reporter: a unit finishes once.
    pub fn finish(self, code: ExitCode) {
        self.tx.send_replace(TaskState {
            status: TaskStatus::from_exit_code(code),
            exit_code: Some(code),
        });
    }
}

/// Run `work` on a background worker and return the handle observing it.
pub fn spawn_unit<F>(ident: impl Into<Ident>, work: F) -> TaskHandle
where
    F: Future<Output = ExitCode> + Send + 'static,
{
    let (handle, reporter) = TaskHandle::pair(ident);
    tokio::spawn(async move {
        let code = work.await;
        reporter.finish(code);
    });
    handle
}
