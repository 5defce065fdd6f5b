use std::path::{Path, PathBuf};

use kinst_model::{DOCUMENT_NAME, DOCUMENT_NAMESPACE};

/// How the client authenticates against the cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    /// Service account of the pod the installer runs in.
    InCluster,
    /// A kubeconfig file; `None` uses kubectl's default lookup.
    Kubeconfig(Option<PathBuf>),
}

#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// kubectl executable.
    pub kubectl: String,
    pub credentials: Credentials,
    /// Fully qualified resource of the configuration document.
    pub resource: String,
    pub name: String,
    pub namespace: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            kubectl: "kubectl".to_string(),
            credentials: Credentials::InCluster,
            resource: "clusterconfigurations.installer.kubesphere.io".to_string(),
            name: DOCUMENT_NAME.to_string(),
            namespace: DOCUMENT_NAMESPACE.to_string(),
        }
    }
}

/// `true` when running inside a pod with a mounted service account.
pub fn in_cluster() -> bool {
    std::env::var("KUBERNETES_SERVICE_HOST").is_ok()
        || Path::new("/var/run/secrets/kubernetes.io/serviceaccount").exists()
}
