//! Task coordinator: sequential fail-fast bootstrap and concurrent wait-for-all batches.
use std::{collections::HashSet, fs, sync::Arc};

use tokio::task::JoinSet;
use tracing::{debug, info, instrument, trace};

use kinst_model::{ProgressEvent, RunResult, UnitOfWork, UnitOutcome};

use crate::{error::CoreError, launcher::Launcher, progress::ProgressTx};

pub struct Coordinator {
    launcher: Arc<dyn Launcher>,
    progress: ProgressTx,
}

impl Coordinator {
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        Self {
            launcher,
            progress: ProgressTx::disabled(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressTx) -> Self {
        self.progress = progress;
        self
    }

    /// Launch every unit at once and wait for all of them.
    ///
    /// A failing unit never cancels its siblings; the batch returns only after every unit is terminal.
    /// There is no timeout: a unit that never finishes stalls the batch.
    #[instrument(level = "debug", skip_all, fields(launcher = self.launcher.name(), total = units.len()))]
    pub async fn run_batch(&self, units: &[UnitOfWork]) -> Result<RunResult, CoreError> {
        ensure_unique(units)?;
        for unit in units {
            prepare_artifacts(unit)?;
        }

        let total = units.len();
        let mut pending = JoinSet::new();
        for unit in units {
            self.progress.publish(ProgressEvent::Started {
                unit: unit.ident.clone(),
            });
            let handle = self.launcher.launch(unit);
            trace!(target: "kinst.core.coordinator", ident = %unit.ident, "unit launched");
            pending.spawn(handle.wait());
        }

        let mut result = RunResult::new();
        while result.len() < total {
            let Some(joined) = pending.join_next().await else {
                break;
            };
            let (ident, outcome) = joined.map_err(|e| CoreError::Join(e.to_string()))?;
            if !result.record(ident.clone(), outcome) {
                continue;
            }
            debug!(target: "kinst.core.coordinator", %ident, code = outcome.exit_code, "unit finished");
            self.progress.publish(ProgressEvent::Finished {
                unit: ident,
                status: outcome.status,
                completed: result.len(),
                total,
            });
        }

        Ok(result)
    }

    /// Run `steps` one after another; the first non-zero exit aborts the sequence.
    #[instrument(level = "debug", skip_all, fields(launcher = self.launcher.name(), steps = steps.len()))]
    pub async fn run_sequence(&self, steps: &[UnitOfWork]) -> Result<(), CoreError> {
        for step in steps {
            info!(target: "kinst.core.coordinator", step = %step.ident, "running bootstrap step");
            let outcome = self.run_step(step).await?;
            if outcome.is_failure() {
                return Err(CoreError::BootstrapStepFailed {
                    step: step.ident.clone(),
                    code: outcome.exit_code,
                });
            }
        }
        Ok(())
    }

    /// Launch a single unit and wait for it.
    pub async fn run_step(&self, unit: &UnitOfWork) -> Result<UnitOutcome, CoreError> {
        prepare_artifacts(unit)?;
        let (_, outcome) = self.launcher.launch(unit).wait().await;
        debug!(target: "kinst.core.coordinator", ident = %unit.ident, code = outcome.exit_code, "step finished");
        Ok(outcome)
    }
}

fn ensure_unique(units: &[UnitOfWork]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(units.len());
    for unit in units {
        if !seen.insert(unit.ident.as_str()) {
            return Err(CoreError::DuplicateUnit(unit.ident.clone()));
        }
    }
    Ok(())
}

/// Remove the artifacts of a previous run so two runs never share a directory.
fn prepare_artifacts(unit: &UnitOfWork) -> Result<(), CoreError> {
    let dir = unit.artifact_dir();
    if dir.exists() {
        trace!(target: "kinst.core.coordinator", dir = %dir.display(), "removing stale artifacts");
        fs::remove_dir_all(dir).map_err(|e| CoreError::io(dir, e))?;
    }
    Ok(())
}
