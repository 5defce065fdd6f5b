use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use kinst_cluster::KubectlClient;
use kinst_exec::ProcLauncher;
use kinst_observe::logger_init;

mod cli;
mod driver;
mod hook;
mod report;

use cli::Cli;
use driver::{Driver, RunSummary};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.config {
        println!("{:#}", hook::hook_config());
        return ExitCode::SUCCESS;
    }

    if let Err(e) = logger_init(&cli.logger_config()) {
        eprintln!("kinst-installd: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli).await {
        Ok(RunSummary::Migrated) => ExitCode::SUCCESS,
        Ok(RunSummary::Installed { failed }) => {
            if failed.is_empty() {
                info!(target: "kinst.installd", "all components installed");
            } else {
                warn!(target: "kinst.installd", ?failed, "some components failed to install");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(target: "kinst.installd", "{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    let paths = cli.paths()?;
    let client = Arc::new(
        KubectlClient::new(cli.cluster_config()).context("configuring cluster access")?,
    );
    let launcher = Arc::new(ProcLauncher::new(cli.runner_config())?);
    info!(
        target: "kinst.installd",
        version = %cli.installer_version,
        playbooks = %paths.playbook_dir.display(),
        results = %paths.results_dir.display(),
        "starting install run"
    );

    Driver::new(paths, client.clone(), client, launcher, cli.installer_version.clone())
        .run()
        .await
}
