//! Boundary to the external API store holding the persisted configuration document.
mod config;
pub use config::{ClusterConfig, Credentials, in_cluster};

mod errors;
pub use errors::ClusterError;

mod store;
pub use store::{ClusterInfo, DocumentStore};

mod kubectl;
pub use kubectl::KubectlClient;

mod memory;
pub use memory::{MemoryStore, StoreOp};
