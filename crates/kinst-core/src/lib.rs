pub mod error;
pub use error::CoreError;

pub mod launcher;
pub use launcher::{Launcher, TaskHandle, TaskReporter, TaskState, spawn_unit};

pub mod coordinator;
pub use coordinator::Coordinator;

pub mod progress;
pub use progress::ProgressTx;

pub mod selection;
pub use selection::{resolve, resolve_file};

pub mod diagnostic;
pub use diagnostic::{DiagnosticError, FailureEvent};

pub mod snapshot;
pub use snapshot::SnapshotKind;

mod paths;
pub use paths::{InstallerPaths, PostInstallStep};
