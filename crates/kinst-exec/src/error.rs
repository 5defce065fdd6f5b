use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("missing program")]
    MissingProgram,
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("wait failed: {0}")]
    Wait(String),
}

pub type ExecResult<T> = Result<T, ExecError>;
