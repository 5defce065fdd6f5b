use std::path::PathBuf;

use thiserror::Error;

use kinst_model::ExitCode;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("the configuration file does not exist: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("configuration file {} is not a json object: {source}", .path.display())]
    ConfigDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("bootstrap step '{step}' failed with exit code {code}")]
    BootstrapStepFailed { step: String, code: ExitCode },

    #[error("post-install step '{step}' failed with exit code {code}")]
    PostInstallStepFailed { step: String, code: ExitCode },

    #[error("unit '{0}' appears more than once in the batch")]
    DuplicateUnit(String),

    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("worker join failed: {0}")]
    Join(String),
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}
