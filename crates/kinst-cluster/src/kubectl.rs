use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, info, trace};

use kinst_model::ConfigurationDocument;

use crate::{
    config::{ClusterConfig, Credentials, in_cluster},
    errors::ClusterError,
    store::{ClusterInfo, DocumentStore},
};

/// Cluster client that shells out to kubectl.
#[derive(Debug, Clone)]
pub struct KubectlClient {
    cfg: ClusterConfig,
}

impl KubectlClient {
    pub fn new(cfg: ClusterConfig) -> Result<Self, ClusterError> {
        if cfg.credentials == Credentials::InCluster && !in_cluster() {
            return Err(ClusterError::NotInCluster);
        }
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.cfg
    }

    fn object_args(&self) -> [&str; 4] {
        [
            self.cfg.resource.as_str(),
            self.cfg.name.as_str(),
            "-n",
            self.cfg.namespace.as_str(),
        ]
    }

    fn global_args(&self) -> Vec<String> {
        match &self.cfg.credentials {
            Credentials::Kubeconfig(Some(path)) => {
                vec!["--kubeconfig".to_string(), path.display().to_string()]
            }
            Credentials::Kubeconfig(None) | Credentials::InCluster => Vec::new(),
        }
    }

    /// Run kubectl with `args`, optionally feeding `stdin`, and return stdout.
    async fn kubectl(&self, args: &[&str], stdin: Option<Vec<u8>>) -> Result<Vec<u8>, ClusterError> {
        let mut cmd = Command::new(&self.cfg.kubectl);
        cmd.args(self.global_args()).args(args);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd.stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        trace!(target: "kinst.cluster.kubectl", ?args, "exec");

        let spawn_err = |source| ClusterError::Spawn {
            program: self.cfg.kubectl.clone(),
            source,
        };
        let mut child = cmd.spawn().map_err(spawn_err)?;
        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(&input).await.map_err(spawn_err)?;
        }
        let output = child.wait_with_output().await.map_err(spawn_err)?;

        if !output.status.success() {
            return Err(ClusterError::Command {
                command: format!("{} {}", self.cfg.kubectl, args.join(" ")),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl DocumentStore for KubectlClient {
    async fn get(&self) -> Result<ConfigurationDocument, ClusterError> {
        let mut args = vec!["get"];
        args.extend(self.object_args());
        args.extend(["-o", "json"]);

        let out = self.kubectl(&args, None).await?;
        let doc = serde_json::from_slice(&out)?;
        debug!(target: "kinst.cluster.kubectl", name = %self.cfg.name, "configuration fetched");
        Ok(doc)
    }

    async fn create(&self, doc: &ConfigurationDocument) -> Result<(), ClusterError> {
        let body = serde_json::to_vec(doc)?;
        self.kubectl(&["create", "-f", "-"], Some(body)).await?;
        info!(target: "kinst.cluster.kubectl", "create cluster configuration successfully");
        Ok(())
    }

    async fn delete(&self) -> Result<(), ClusterError> {
        let mut args = vec!["delete"];
        args.extend(self.object_args());

        self.kubectl(&args, None).await?;
        info!(target: "kinst.cluster.kubectl", "delete old cluster configuration successfully");
        Ok(())
    }
}

#[async_trait]
impl ClusterInfo for KubectlClient {
    async fn node_count(&self) -> Result<usize, ClusterError> {
        let out = self.kubectl(&["get", "nodes", "-o", "json"], None).await?;
        let nodes: Value = serde_json::from_slice(&out)?;
        nodes
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::len)
            .ok_or_else(|| ClusterError::Unexpected("node list without items".into()))
    }

    async fn server_version(&self) -> Result<String, ClusterError> {
        let out = self.kubectl(&["version", "-o", "json"], None).await?;
        let version: Value = serde_json::from_slice(&out)?;
        version
            .pointer("/serverVersion/gitVersion")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ClusterError::Unexpected("version without serverVersion.gitVersion".into()))
    }
}
