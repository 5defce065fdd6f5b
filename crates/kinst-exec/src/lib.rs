mod error;
pub use error::{ExecError, ExecResult};

mod util;

pub mod r#fn;
pub use r#fn::FnLauncher;

#[cfg(feature = "proc")]
pub mod proc;
#[cfg(feature = "proc")]
pub use proc::{ProcConfig, ProcLauncher};

pub mod prelude {
    pub use crate::FnLauncher;
    pub use crate::error::{ExecError, ExecResult};
    #[cfg(feature = "proc")]
    pub use crate::proc::{ProcConfig, ProcLauncher};
}
