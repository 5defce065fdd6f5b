use async_trait::async_trait;

use kinst_model::ConfigurationDocument;

use crate::errors::ClusterError;

/// Get/create/delete access to the single persisted configuration document.
///
/// There is no optimistic concurrency: a concurrent writer between `delete` and `create` is not detected.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self) -> Result<ConfigurationDocument, ClusterError>;
    async fn create(&self, doc: &ConfigurationDocument) -> Result<(), ClusterError>;
    async fn delete(&self) -> Result<(), ClusterError>;
}

/// Facts about the cluster written into the configuration snapshot.
#[async_trait]
pub trait ClusterInfo: Send + Sync {
    async fn node_count(&self) -> Result<usize, ClusterError>;
    async fn server_version(&self) -> Result<String, ClusterError>;
}
