use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use kinst_cluster::{ClusterConfig, Credentials};
use kinst_core::InstallerPaths;
use kinst_exec::{ProcConfig, proc::DEFAULT_RUNNER};
use kinst_model::DEFAULT_INSTALLER_VERSION;
use kinst_observe::{LoggerConfig, LoggerFormat};

/// Installs the cluster add-on components described by the stored cluster configuration.
#[derive(Debug, Parser)]
#[command(name = "kinst-installd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print the hook registration document and exit.
    #[arg(long)]
    pub config: bool,

    /// Use paths under the working directory and kubeconfig credentials.
    #[arg(long)]
    pub debug: bool,

    /// Kubeconfig used in debug mode (kubectl's default lookup when absent).
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// kubectl executable.
    #[arg(long, default_value = "kubectl")]
    pub kubectl: String,

    /// Install procedure runner executable.
    #[arg(long, default_value = DEFAULT_RUNNER)]
    pub runner: String,

    /// Version label this installer writes and compares against `status.core.version`.
    #[arg(long, env = "KINST_INSTALLER_VERSION", default_value = DEFAULT_INSTALLER_VERSION)]
    pub installer_version: String,

    /// Log output format: text, json or journald.
    #[arg(long, env = "KINST_LOG_FORMAT", default_value = "text")]
    pub log_format: LoggerFormat,

    /// Log filter directive.
    #[arg(long, env = "KINST_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig::default()
            .with_format(self.log_format)
            .with_level(self.log_level.clone())
    }

    pub fn paths(&self) -> anyhow::Result<InstallerPaths> {
        if !self.debug {
            return Ok(InstallerPaths::in_cluster());
        }
        let root = std::env::current_dir().context("resolving working directory")?;
        Ok(InstallerPaths::debug(root))
    }

    pub fn cluster_config(&self) -> ClusterConfig {
        let credentials = if self.debug {
            Credentials::Kubeconfig(self.kubeconfig.clone())
        } else {
            Credentials::InCluster
        };
        ClusterConfig {
            kubectl: self.kubectl.clone(),
            credentials,
            ..ClusterConfig::default()
        }
    }

    pub fn runner_config(&self) -> ProcConfig {
        ProcConfig {
            program: self.runner.clone(),
            ..ProcConfig::default()
        }
    }
}
