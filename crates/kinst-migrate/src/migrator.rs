use std::sync::Arc;

use tracing::{debug, info, instrument};

use kinst_cluster::DocumentStore;
use kinst_model::ConfigurationDocument;

use crate::{
    error::MigrateError,
    plan::{plan, rebuild},
};

#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    /// Stored document is current; the install proceeds with it.
    NoChange(ConfigurationDocument),
    /// Stored document was replaced; the run must end here.
    Migrated(ConfigurationDocument),
}

impl MigrationOutcome {
    pub fn is_migrated(&self) -> bool {
        matches!(self, MigrationOutcome::Migrated(_))
    }

    pub fn document(&self) -> &ConfigurationDocument {
        match self {
            MigrationOutcome::NoChange(doc) | MigrationOutcome::Migrated(doc) => doc,
        }
    }
}

/// Fetches the stored configuration and replaces it when its schema or version is stale.
pub struct Migrator {
    store: Arc<dyn DocumentStore>,
    installer_version: String,
}

impl Migrator {
    pub fn new(store: Arc<dyn DocumentStore>, installer_version: impl Into<String>) -> Self {
        Self {
            store,
            installer_version: installer_version.into(),
        }
    }

    /// The replacement is delete-then-create; a failure between the two leaves no document stored.
    #[instrument(level = "debug", skip_all, fields(version = %self.installer_version))]
    pub async fn migrate(&self) -> Result<MigrationOutcome, MigrateError> {
        let current = self.store.get().await.map_err(MigrateError::Fetch)?;

        let plan = plan(&current, &self.installer_version);
        if !plan.upgrade_required() {
            debug!(target: "kinst.migrate", "cluster configuration is current");
            return Ok(MigrationOutcome::NoChange(current));
        }

        info!(
            target: "kinst.migrate",
            fired = ?plan.fired,
            version_mismatch = plan.version_mismatch,
            "migrating cluster configuration"
        );
        let next = rebuild(&current, plan, &self.installer_version);

        self.store.delete().await.map_err(MigrateError::Delete)?;
        self.store.create(&next).await.map_err(MigrateError::Create)?;

        info!(target: "kinst.migrate", "cluster configuration replaced");
        Ok(MigrationOutcome::Migrated(next))
    }
}
