use std::{process::Stdio, sync::Arc};

use tracing::{debug, error, trace};

use kinst_core::{Launcher, TaskHandle, spawn_unit};
use kinst_model::{EXIT_SPAWN_FAILED, ExitCode, UnitOfWork};

use crate::{
    error::{ExecError, ExecResult},
    util::{cmd_program, exit_code},
};

/// Default procedure runner invoked for every unit.
pub const DEFAULT_RUNNER: &str = "ansible-runner";

/// Process configuration shared by every unit this launcher starts.
#[derive(Clone, Debug)]
pub struct ProcConfig {
    /// Runner executable.
    pub program: String,
    /// Arguments placed before the runner's own arguments (wrappers, interpreter flags).
    pub extra_args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl Default for ProcConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_RUNNER.to_string(),
            extra_args: Vec::new(),
            env: Vec::new(),
        }
    }
}

/// Launcher that runs each unit as a child process of the procedure runner.
///
/// Output of quiet units is discarded; the execution trail lands in the unit's artifact directory.
pub struct ProcLauncher {
    name: &'static str,
    cfg: Arc<ProcConfig>,
}

impl ProcLauncher {
    pub fn new(cfg: ProcConfig) -> ExecResult<Self> {
        if cfg.program.trim().is_empty() {
            return Err(ExecError::MissingProgram);
        }
        Ok(Self {
            name: "proc",
            cfg: Arc::new(cfg),
        })
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl Launcher for ProcLauncher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn launch(&self, unit: &UnitOfWork) -> TaskHandle {
        let cfg = Arc::clone(&self.cfg);
        let unit = unit.clone();
        spawn_unit(unit.ident.clone(), async move {
            match run(&cfg, &unit).await {
                Ok(code) => code,
                Err(e) => {
                    error!(target: "kinst.exec.proc", ident = %unit.ident, error = %e, "unit could not be run");
                    EXIT_SPAWN_FAILED
                }
            }
        })
    }
}

async fn run(cfg: &ProcConfig, unit: &UnitOfWork) -> ExecResult<ExitCode> {
    let mut args = cfg.extra_args.clone();
    args.extend(runner_args(unit));

    trace!(target: "kinst.exec.proc", program = %cfg.program, ?args, "spawn");
    let mut cmd = cmd_program(&cfg.program, &args);
    for (k, v) in &cfg.env {
        cmd.env(k, v);
    }
    cmd.stdin(Stdio::null());
    if unit.quiet {
        cmd.stdout(Stdio::null());
    } else {
        cmd.stdout(Stdio::inherit());
    }
    cmd.stderr(Stdio::inherit());

    let mut child = cmd
        .spawn()
        .map_err(|e| ExecError::Spawn(format!("{}: {e}", cfg.program)))?;
    let status = child
        .wait()
        .await
        .map_err(|e| ExecError::Wait(e.to_string()))?;

    let code = exit_code(status);
    debug!(target: "kinst.exec.proc", ident = %unit.ident, code, "exited");
    Ok(code)
}

/// Runner invocation for one unit:
/// `run <private_data_dir> -p <playbook> --ident <ident> --artifact-dir <dir> [--rotate-artifacts N] [-q]`.
pub fn runner_args(unit: &UnitOfWork) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        unit.private_data_dir.display().to_string(),
        "-p".to_string(),
        unit.playbook.display().to_string(),
        "--ident".to_string(),
        unit.ident.clone(),
        "--artifact-dir".to_string(),
        unit.artifact_dir.display().to_string(),
    ];
    if let Some(keep) = unit.rotate_artifacts {
        args.push("--rotate-artifacts".to_string());
        args.push(keep.to_string());
    }
    if unit.quiet {
        args.push("-q".to_string());
    }
    args
}
