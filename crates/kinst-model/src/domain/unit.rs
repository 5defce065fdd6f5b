use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{EVENTS_DIR, Ident};

/// One invocation of an install procedure together with its isolated output directory.
///
/// Immutable once built; the coordinator owns the artifact directory for the duration of the run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOfWork {
    /// Run identifier, unique within a run.
    pub ident: Ident,
    /// Install procedure invoked by the launcher (e.g. a playbook path).
    pub playbook: PathBuf,
    /// Directory holding the runner metadata shared by all units.
    pub private_data_dir: PathBuf,
    /// Directory where this unit writes its execution trail.
    pub artifact_dir: PathBuf,
    /// Suppress procedure output on the installer's stdout.
    #[serde(default)]
    pub quiet: bool,
    /// How many previous artifact runs the procedure runner keeps around.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate_artifacts: Option<u32>,
}

impl UnitOfWork {
    pub fn new(
        ident: impl Into<Ident>,
        playbook: impl Into<PathBuf>,
        private_data_dir: impl Into<PathBuf>,
        artifact_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ident: ident.into(),
            playbook: playbook.into(),
            private_data_dir: private_data_dir.into(),
            artifact_dir: artifact_dir.into(),
            quiet: false,
            rotate_artifacts: None,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_rotation(mut self, keep: u32) -> Self {
        self.rotate_artifacts = Some(keep);
        self
    }

    /// Directory of the current run: `<artifact_dir>/<ident>`.
    pub fn run_dir(&self) -> PathBuf {
        self.artifact_dir.join(&self.ident)
    }

    /// Event log directory of the current run: `<artifact_dir>/<ident>/job_events`.
    pub fn events_dir(&self) -> PathBuf {
        self.run_dir().join(EVENTS_DIR)
    }

    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_dir_nests_ident_twice() {
        let unit = UnitOfWork::new(
            "logging",
            "/kubesphere/playbooks/logging.yaml",
            "/kubesphere/results",
            "/kubesphere/results/logging",
        );

        assert_eq!(
            unit.events_dir(),
            PathBuf::from("/kubesphere/results/logging/logging/job_events")
        );
    }

    #[test]
    fn builder_defaults_are_loud_and_unrotated() {
        let unit = UnitOfWork::new("common", "common.yaml", "results", "results/common");
        assert!(!unit.quiet);
        assert_eq!(unit.rotate_artifacts, None);

        let unit = unit.quiet(true).with_rotation(1);
        assert!(unit.quiet);
        assert_eq!(unit.rotate_artifacts, Some(1));
    }
}
