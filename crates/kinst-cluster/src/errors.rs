use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("in-cluster credentials requested but no service account is mounted")]
    NotInCluster,

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {code:?}: {stderr}")]
    Command {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("invalid json from cluster: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected cluster response: {0}")]
    Unexpected(String),

    #[error("configuration document {0} not found")]
    NotFound(String),
}
