use std::{
    fs,
    path::{Path, PathBuf},
};

use kinst_model::{ComponentSelection, UnitOfWork};

use crate::error::CoreError;

/// Filesystem locations used by one installer run.
///
/// Built once from the process mode and passed to every component that touches disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerPaths {
    /// Directory holding the install procedures (`<name>.yaml`).
    pub playbook_dir: PathBuf,
    /// Private data directory of the procedure runner; every unit's artifacts live below it.
    pub results_dir: PathBuf,
    /// Configuration snapshot read by the component resolver.
    pub config_file: PathBuf,
    /// Status snapshot.
    pub status_file: PathBuf,
}

/// Bootstrap sequence: (ident, procedure, artifact directory).
const BOOTSTRAP: [(&str, &str, &str); 4] = [
    ("preInstall", "preinstall", "preinstall"),
    ("metrics-server", "metrics_server", "metrics_server"),
    ("common", "common", "common"),
    ("ks-core", "ks-core", "ks-core"),
];

/// Steps run after the component batch. Every one of them is fatal on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostInstallStep {
    Config,
    ResultInfo,
    Migration,
    Telemetry,
}

impl PostInstallStep {
    pub fn ident(&self) -> &'static str {
        match self {
            PostInstallStep::Config => "ks-config",
            PostInstallStep::ResultInfo => "result",
            PostInstallStep::Migration => "ks-migration",
            PostInstallStep::Telemetry => "telemetry",
        }
    }

    fn procedure(&self) -> &'static str {
        match self {
            PostInstallStep::Config => "ks-config",
            PostInstallStep::ResultInfo => "result-info",
            PostInstallStep::Migration => "ks-migration",
            PostInstallStep::Telemetry => "telemetry",
        }
    }

    fn quiet(&self) -> bool {
        !matches!(self, PostInstallStep::Migration)
    }
}

impl InstallerPaths {
    /// Fixed absolute layout inside the installer image.
    pub fn in_cluster() -> Self {
        Self {
            playbook_dir: PathBuf::from("/kubesphere/playbooks"),
            results_dir: PathBuf::from("/kubesphere/results"),
            config_file: PathBuf::from("/kubesphere/config/ks-config.json"),
            status_file: PathBuf::from("/kubesphere/config/ks-status.json"),
        }
    }

    /// Layout relative to a working directory, for local runs.
    pub fn debug(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let results_dir = root.join("results");
        Self {
            playbook_dir: root.join("playbooks"),
            config_file: results_dir.join("ks-config.json"),
            status_file: results_dir.join("ks-status.json"),
            results_dir,
        }
    }

    pub fn playbook(&self, name: &str) -> PathBuf {
        self.playbook_dir.join(format!("{name}.yaml"))
    }

    /// Banner printed after a fully successful run.
    pub fn running_banner(&self) -> PathBuf {
        self.playbook_dir.join("kubesphere_running")
    }

    pub fn ensure_results_dir(&self) -> Result<(), CoreError> {
        fs::create_dir_all(&self.results_dir).map_err(|e| CoreError::io(&self.results_dir, e))
    }

    fn unit(&self, ident: &str, procedure: &str, artifacts: &str) -> UnitOfWork {
        UnitOfWork::new(
            ident,
            self.playbook(procedure),
            &self.results_dir,
            self.results_dir.join(artifacts),
        )
    }

    /// Batch unit of a selected component.
    pub fn component_unit(&self, name: &str) -> UnitOfWork {
        self.unit(name, name, name).quiet(true).with_rotation(1)
    }

    pub fn component_units(&self, selection: &ComponentSelection) -> Vec<UnitOfWork> {
        selection
            .enabled()
            .iter()
            .map(|name| self.component_unit(name))
            .collect()
    }

    pub fn bootstrap_units(&self) -> Vec<UnitOfWork> {
        BOOTSTRAP
            .iter()
            .map(|(ident, procedure, artifacts)| self.unit(ident, procedure, artifacts))
            .collect()
    }

    pub fn post_install_unit(&self, step: PostInstallStep) -> UnitOfWork {
        let procedure = step.procedure();
        self.unit(step.ident(), procedure, procedure).quiet(step.quiet())
    }
}
