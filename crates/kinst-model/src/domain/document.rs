use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    DOCUMENT_API_VERSION, DOCUMENT_KIND, DOCUMENT_NAME, DOCUMENT_NAMESPACE, VERSION_LABEL,
};

/// JSON object used for the free-form `spec` and `status` trees.
pub type Mapping = serde_json::Map<String, Value>;

/// Metadata subset the installer reads and writes.
///
/// Server-populated fields (uid, resourceVersion, ...) are dropped on decode;
/// a recreated document always starts from fresh metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// The persisted cluster configuration: desired `spec` plus observed `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: Mapping,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Mapping>,
}

impl ConfigurationDocument {
    /// Fresh document with the installer's fixed identity and `version` label.
    pub fn new(spec: Mapping, status: Option<Mapping>, version: &str) -> Self {
        let mut labels = BTreeMap::new();
        labels.insert(VERSION_LABEL.to_string(), version.to_string());

        Self {
            api_version: DOCUMENT_API_VERSION.to_string(),
            kind: DOCUMENT_KIND.to_string(),
            metadata: ObjectMeta {
                name: DOCUMENT_NAME.to_string(),
                namespace: DOCUMENT_NAMESPACE.to_string(),
                labels,
            },
            spec,
            status,
        }
    }

    /// `status.core`, if the status tree has one.
    pub fn status_core(&self) -> Option<&Mapping> {
        self.status.as_ref()?.get("core")?.as_object()
    }

    /// `status.core.version` as recorded by the last successful install.
    pub fn status_core_version(&self) -> Option<&Value> {
        self.status_core()?.get("version")
    }

    /// `status.clusterId`, the only status field carried across a migration.
    pub fn cluster_id(&self) -> Option<&Value> {
        self.status.as_ref()?.get("clusterId")
    }

    /// `true` when `status.core.migration` asks for the post-install migration step.
    pub fn migration_requested(&self) -> bool {
        self.status_core()
            .and_then(|core| core.get("migration"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
