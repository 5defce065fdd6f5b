use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use kinst_model::{ConfigurationDocument, DOCUMENT_NAME};

use crate::{
    errors::ClusterError,
    store::{ClusterInfo, DocumentStore},
};

/// Operation observed by a [`MemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Get,
    Create,
    Delete,
}

/// In-process document store; records every operation in order.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    nodes: usize,
    version: String,
}

#[derive(Debug, Default)]
struct Inner {
    doc: Option<ConfigurationDocument>,
    ops: Vec<StoreOp>,
}

impl MemoryStore {
    pub fn new(doc: Option<ConfigurationDocument>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                doc,
                ops: Vec::new(),
            }),
            nodes: 1,
            version: "v0.0.0".to_string(),
        }
    }

    pub fn with_cluster(mut self, nodes: usize, version: impl Into<String>) -> Self {
        self.nodes = nodes;
        self.version = version.into();
        self
    }

    pub fn document(&self) -> Option<ConfigurationDocument> {
        self.lock().doc.clone()
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.lock().ops.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self) -> Result<ConfigurationDocument, ClusterError> {
        let mut inner = self.lock();
        inner.ops.push(StoreOp::Get);
        inner
            .doc
            .clone()
            .ok_or_else(|| ClusterError::NotFound(DOCUMENT_NAME.to_string()))
    }

    async fn create(&self, doc: &ConfigurationDocument) -> Result<(), ClusterError> {
        let mut inner = self.lock();
        inner.ops.push(StoreOp::Create);
        if inner.doc.is_some() {
            return Err(ClusterError::Unexpected(format!(
                "{} already exists",
                doc.metadata.name
            )));
        }
        inner.doc = Some(doc.clone());
        Ok(())
    }

    async fn delete(&self) -> Result<(), ClusterError> {
        let mut inner = self.lock();
        inner.ops.push(StoreOp::Delete);
        inner
            .doc
            .take()
            .map(|_| ())
            .ok_or_else(|| ClusterError::NotFound(DOCUMENT_NAME.to_string()))
    }
}

#[async_trait]
impl ClusterInfo for MemoryStore {
    async fn node_count(&self) -> Result<usize, ClusterError> {
        Ok(self.nodes)
    }

    async fn server_version(&self) -> Result<String, ClusterError> {
        Ok(self.version.clone())
    }
}
