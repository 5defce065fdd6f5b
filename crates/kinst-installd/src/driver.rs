use std::sync::Arc;

use anyhow::Context;
use tracing::{info, instrument, warn};

use kinst_cluster::{ClusterInfo, DocumentStore};
use kinst_core::{
    Coordinator, CoreError, InstallerPaths, Launcher, PostInstallStep, diagnostic, progress,
    resolve_file, snapshot,
};
use kinst_migrate::{MigrationOutcome, Migrator};
use kinst_model::{ConfigurationDocument, Ident, RunResult, UnitOfWork};
use kinst_observe::ProgressView;

use crate::report;

/// How a run ended when no fatal error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSummary {
    /// The stored configuration was replaced; the hook fires again on the new object.
    Migrated,
    /// Components were installed; `failed` lists the units that did not succeed.
    Installed { failed: Vec<Ident> },
}

/// One end-to-end install run.
pub struct Driver {
    paths: InstallerPaths,
    store: Arc<dyn DocumentStore>,
    cluster: Arc<dyn ClusterInfo>,
    launcher: Arc<dyn Launcher>,
    installer_version: String,
}

impl Driver {
    pub fn new(
        paths: InstallerPaths,
        store: Arc<dyn DocumentStore>,
        cluster: Arc<dyn ClusterInfo>,
        launcher: Arc<dyn Launcher>,
        installer_version: impl Into<String>,
    ) -> Self {
        Self {
            paths,
            store,
            cluster,
            launcher,
            installer_version: installer_version.into(),
        }
    }

    #[instrument(level = "debug", skip_all, fields(launcher = self.launcher.name()))]
    pub async fn run(&self) -> anyhow::Result<RunSummary> {
        self.paths.ensure_results_dir()?;

        let migrator = Migrator::new(self.store.clone(), self.installer_version.clone());
        let doc = match migrator.migrate().await? {
            MigrationOutcome::Migrated(_) => {
                info!(target: "kinst.installd", "cluster configuration migrated; waiting for the next event");
                return Ok(RunSummary::Migrated);
            }
            MigrationOutcome::NoChange(doc) => doc,
        };

        self.write_snapshots(&doc).await?;
        let selection = resolve_file(&self.paths.config_file)?;
        info!(
            target: "kinst.installd",
            enabled = ?selection.enabled(),
            disabled = ?selection.disabled(),
            "component selection resolved"
        );

        let coordinator = Coordinator::new(self.launcher.clone());
        coordinator.run_sequence(&self.paths.bootstrap_units()).await?;

        let units = self.paths.component_units(&selection);
        let result = self.install_components(&units).await?;
        self.report_failures(&units, &result);

        let batch_failed = result.overall_failed();
        self.post_install(&coordinator, batch_failed).await?;

        Ok(RunSummary::Installed {
            failed: result.failed().map(|(ident, _)| ident.to_string()).collect(),
        })
    }

    async fn write_snapshots(&self, doc: &ConfigurationDocument) -> anyhow::Result<()> {
        let nodes = self.cluster.node_count().await.context("counting cluster nodes")?;
        let version = self
            .cluster
            .server_version()
            .await
            .context("reading kubernetes version")?;

        snapshot::write_config_snapshot(&self.paths.config_file, &doc.spec, nodes, &version)?;
        snapshot::write_status_snapshot(&self.paths.status_file, doc.status.as_ref())?;
        Ok(())
    }

    async fn install_components(&self, units: &[UnitOfWork]) -> Result<RunResult, CoreError> {
        let (tx, rx) = progress::channel(progress::capacity_for(units.len()));
        let view = tokio::spawn(ProgressView::new(rx).run());

        let batch = Coordinator::new(self.launcher.clone()).with_progress(tx);
        info!(target: "kinst.installd", "{}", report::separator());
        info!(target: "kinst.installd", "Waiting for all tasks to be completed ...");
        let result = batch.run_batch(units).await;
        drop(batch);

        if let Err(e) = view.await {
            warn!(target: "kinst.installd", error = %e, "progress view stopped abnormally");
        }
        info!(target: "kinst.installd", "{}", report::separator());
        info!(target: "kinst.installd", "Collecting installation results ...");
        result
    }

    fn report_failures(&self, units: &[UnitOfWork], result: &RunResult) {
        let mut stdout = std::io::stdout().lock();
        for (ident, outcome) in result.failed() {
            let Some(unit) = units.iter().find(|u| u.ident == ident) else {
                continue;
            };
            match diagnostic::extract(unit) {
                Ok(event) => {
                    if let Err(e) = report::write_failure(&mut stdout, ident, &event.record) {
                        warn!(target: "kinst.installd", unit = ident, error = %e, "failed to print failure report");
                    }
                }
                Err(e) => {
                    warn!(
                        target: "kinst.installd",
                        unit = ident,
                        code = outcome.exit_code,
                        error = %e,
                        "no failure record available"
                    );
                }
            }
        }
    }

    async fn post_install(&self, coordinator: &Coordinator, batch_failed: bool) -> anyhow::Result<()> {
        self.post_install_step(coordinator, PostInstallStep::Config).await?;
        self.post_install_step(coordinator, PostInstallStep::ResultInfo).await?;

        let doc = self
            .store
            .get()
            .await
            .context("re-reading cluster configuration")?;
        if doc.migration_requested() && !batch_failed {
            self.post_install_step(coordinator, PostInstallStep::Migration).await?;
        }

        if !batch_failed {
            let banner = self.paths.running_banner();
            match tokio::fs::read_to_string(&banner).await {
                Ok(text) => info!(target: "kinst.installd", "{text}"),
                Err(e) => warn!(target: "kinst.installd", path = %banner.display(), error = %e, "install banner unreadable"),
            }
        }

        self.post_install_step(coordinator, PostInstallStep::Telemetry).await?;
        Ok(())
    }

    async fn post_install_step(
        &self,
        coordinator: &Coordinator,
        step: PostInstallStep,
    ) -> Result<(), CoreError> {
        let outcome = coordinator.run_step(&self.paths.post_install_unit(step)).await?;
        if outcome.is_failure() {
            return Err(CoreError::PostInstallStepFailed {
                step: step.ident().to_string(),
                code: outcome.exit_code,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinst_cluster::{MemoryStore, StoreOp};
    use kinst_exec::FnLauncher;
    use kinst_model::{ExitCode, Mapping};
    use serde_json::{Value, json};
    use std::sync::Mutex;

    const VERSION: &str = "v3.4.0";

    struct Fixture {
        _root: tempfile::TempDir,
        paths: InstallerPaths,
        store: Arc<MemoryStore>,
        launcher: Arc<FnLauncher>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Fixture {
        fn new(spec: Value, status: Value) -> Self {
            let root = tempfile::tempdir().unwrap();
            let paths = InstallerPaths::debug(root.path());
            std::fs::create_dir_all(&paths.playbook_dir).unwrap();
            std::fs::write(paths.running_banner(), "Welcome").unwrap();

            let doc = ConfigurationDocument::new(
                spec.as_object().cloned().unwrap(),
                status.as_object().cloned(),
                VERSION,
            );
            Self {
                _root: root,
                paths,
                store: Arc::new(MemoryStore::new(Some(doc)).with_cluster(3, "v1.21.5")),
                launcher: Arc::new(FnLauncher::new()),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn succeed(&self, idents: &[&str]) -> &Self {
            for ident in idents {
                self.script(ident, 0);
            }
            self
        }

        fn script(&self, ident: &str, code: ExitCode) -> &Self {
            let calls = self.calls.clone();
            self.launcher.register(ident, move |unit: UnitOfWork| {
                let calls = calls.clone();
                async move {
                    calls.lock().unwrap().push(unit.ident.clone());
                    if code != 0 {
                        let dir = unit.events_dir();
                        tokio::fs::create_dir_all(&dir).await.unwrap();
                        for (name, body) in [
                            ("1-start.json", json!({"event": "playbook_on_start"})),
                            ("2-task.json", json!({"event": "runner_on_failed"})),
                            ("3-stats.json", json!({"event": "playbook_on_stats"})),
                        ] {
                            tokio::fs::write(dir.join(name), body.to_string()).await.unwrap();
                        }
                    }
                    code
                }
            });
            self
        }

        fn driver(&self) -> Driver {
            Driver::new(
                self.paths.clone(),
                self.store.clone(),
                self.store.clone(),
                self.launcher.clone(),
                VERSION,
            )
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    const BOOTSTRAP: [&str; 4] = ["preInstall", "metrics-server", "common", "ks-core"];
    const COMPONENTS: [&str; 5] = ["alerting", "monitoring", "multicluster", "openpitrix", "network"];

    fn current_spec() -> Value {
        json!({
            "common": {"core": {"console": {}}},
            "alerting": {"enabled": true},
            "metrics_server": {"enabled": true}
        })
    }

    #[tokio::test]
    async fn legacy_configuration_ends_the_run_after_migration() {
        let fx = Fixture::new(
            json!({"console": {"port": 30880}}),
            json!({"core": {"version": "v3.3.0"}}),
        );

        let summary = fx.driver().run().await.unwrap();
        assert_eq!(summary, RunSummary::Migrated);
        assert!(fx.calls().is_empty());
        assert_eq!(fx.store.ops(), vec![StoreOp::Get, StoreOp::Delete, StoreOp::Create]);
        assert!(fx.paths.results_dir.is_dir());
    }

    #[tokio::test]
    async fn full_run_installs_and_reports() {
        let fx = Fixture::new(current_spec(), json!({"core": {"version": VERSION}}));
        fx.succeed(&BOOTSTRAP)
            .succeed(&COMPONENTS[1..])
            .script("alerting", 2)
            .succeed(&["ks-config", "result", "ks-migration", "telemetry"]);

        let summary = fx.driver().run().await.unwrap();
        assert_eq!(
            summary,
            RunSummary::Installed {
                failed: vec!["alerting".to_string()]
            }
        );

        let calls = fx.calls();
        assert_eq!(&calls[..4], &BOOTSTRAP);
        let mut batch = calls[4..9].to_vec();
        batch.sort();
        let mut expected: Vec<String> = COMPONENTS.iter().map(|s| s.to_string()).collect();
        expected.sort();
        assert_eq!(batch, expected);
        assert_eq!(&calls[9..], &["ks-config", "result", "telemetry"]);

        let config: Mapping =
            serde_json::from_str(&std::fs::read_to_string(&fx.paths.config_file).unwrap()).unwrap();
        assert_eq!(config["nodeNum"], json!(3));
        assert_eq!(config["kubernetes_version"], json!("v1.21.5"));
    }

    #[tokio::test]
    async fn requested_migration_step_runs_after_clean_batch() {
        let fx = Fixture::new(
            current_spec(),
            json!({"core": {"version": VERSION, "migration": true}}),
        );
        fx.succeed(&BOOTSTRAP)
            .succeed(&COMPONENTS)
            .succeed(&["ks-config", "result", "ks-migration", "telemetry"]);

        let summary = fx.driver().run().await.unwrap();
        assert_eq!(summary, RunSummary::Installed { failed: vec![] });
        assert_eq!(
            &fx.calls()[9..],
            &["ks-config", "result", "ks-migration", "telemetry"]
        );
    }

    #[tokio::test]
    async fn failed_bootstrap_step_stops_the_run() {
        let fx = Fixture::new(current_spec(), json!({"core": {"version": VERSION}}));
        fx.succeed(&BOOTSTRAP[..2]).script("common", 1);

        let err = fx.driver().run().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::BootstrapStepFailed { step, code: 1 }) if step == "common"
        ));
        assert_eq!(fx.calls(), vec!["preInstall", "metrics-server", "common"]);
    }

    #[tokio::test]
    async fn failed_post_install_step_is_fatal() {
        let fx = Fixture::new(current_spec(), json!({"core": {"version": VERSION}}));
        fx.succeed(&BOOTSTRAP)
            .succeed(&COMPONENTS)
            .succeed(&["ks-config"])
            .script("result", 4);

        let err = fx.driver().run().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::PostInstallStepFailed { step, code: 4 }) if step == "result"
        ));
        assert!(!fx.calls().contains(&"telemetry".to_string()));
    }
}
