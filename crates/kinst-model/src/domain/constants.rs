/// Name of the event log directory inside a unit's run directory.
pub const EVENTS_DIR: &str = "job_events";

/// Exit code recorded when the install procedure could not be spawned at all.
pub const EXIT_SPAWN_FAILED: i32 = 127;

/// Exit code recorded when a worker vanished without reporting a result.
pub const EXIT_LOST: i32 = -1;

/// Components that are always part of the generic batch.
pub const BASELINE_COMPONENTS: [&str; 4] = ["monitoring", "multicluster", "openpitrix", "network"];

/// Components never installed by the generic batch (bootstrap or late steps own them).
pub const EXCLUDED_COMPONENTS: [&str; 3] = ["metrics_server", "networkpolicy", "telemetry"];

/// API group/version of the persisted configuration document.
pub const DOCUMENT_API_VERSION: &str = "installer.kubesphere.io/v1alpha1";

/// Kind of the persisted configuration document.
pub const DOCUMENT_KIND: &str = "ClusterConfiguration";

/// Fixed name of the persisted configuration document.
pub const DOCUMENT_NAME: &str = "ks-installer";

/// Namespace of the persisted configuration document.
pub const DOCUMENT_NAMESPACE: &str = "kubesphere-system";

/// Metadata label carrying the installer version that wrote the document.
pub const VERSION_LABEL: &str = "version";

/// Version label of this installer build.
pub const DEFAULT_INSTALLER_VERSION: &str = "master";
