mod unit;
pub use unit::UnitOfWork;

mod task_status;
pub use task_status::TaskStatus;

mod outcome;
pub use outcome::{RunResult, UnitOutcome};

mod selection;
pub use selection::ComponentSelection;

mod document;
pub use document::{ConfigurationDocument, Mapping, ObjectMeta};

mod progress;
pub use progress::ProgressEvent;

mod constants;
pub use constants::*;

/// Identity of a unit of work, unique within a run.
///
/// Also used as the name of the unit's artifact sub-directory.
pub type Ident = String;

/// Process exit code reported by an install procedure.
pub type ExitCode = i32;
