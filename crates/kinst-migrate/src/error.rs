use thiserror::Error;

use kinst_cluster::ClusterError;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("failed to fetch cluster configuration: {0}")]
    Fetch(#[source] ClusterError),

    #[error("failed to delete old cluster configuration: {0}")]
    Delete(#[source] ClusterError),

    #[error("failed to create migrated cluster configuration: {0}")]
    Create(#[source] ClusterError),
}
