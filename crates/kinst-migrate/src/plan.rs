use serde_json::Value;

use kinst_model::{ConfigurationDocument, Mapping};

use crate::rules::apply_chain;

/// Result of running the rule chain over a document, before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationPlan {
    pub spec: Mapping,
    pub fired: Vec<&'static str>,
    pub version_mismatch: bool,
}

impl MigrationPlan {
    pub fn upgrade_required(&self) -> bool {
        !self.fired.is_empty() || self.version_mismatch
    }
}

/// `true` when `status.core` exists and its `version` is absent or differs from `installer_version`.
///
/// A document without `status.core` was never installed by a core run and is not considered stale.
pub fn version_mismatch(status: Option<&Mapping>, installer_version: &str) -> bool {
    let Some(core) = status.and_then(|s| s.get("core")).and_then(Value::as_object) else {
        return false;
    };
    core.get("version").and_then(Value::as_str) != Some(installer_version)
}

pub fn plan(doc: &ConfigurationDocument, installer_version: &str) -> MigrationPlan {
    let mut spec = doc.spec.clone();
    let status = doc.status.as_ref();
    let fired = apply_chain(&mut spec, status);

    MigrationPlan {
        spec,
        fired,
        version_mismatch: version_mismatch(status, installer_version),
    }
}

/// Fresh document carrying the migrated spec and only `status.clusterId` from `current`.
pub fn rebuild(
    current: &ConfigurationDocument,
    plan: MigrationPlan,
    installer_version: &str,
) -> ConfigurationDocument {
    let status = current.cluster_id().map(|id| {
        let mut status = Mapping::new();
        status.insert("clusterId".into(), id.clone());
        status
    });
    ConfigurationDocument::new(plan.spec, status, installer_version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(spec: Value, status: Option<Value>) -> ConfigurationDocument {
        ConfigurationDocument::new(
            spec.as_object().cloned().unwrap(),
            status.and_then(|s| s.as_object().cloned()),
            "v3.0.0",
        )
    }

    #[test]
    fn version_check_requires_core() {
        let none = json!({"clusterId": "x"});
        assert!(!version_mismatch(none.as_object(), "v3.4.0"));
        assert!(!version_mismatch(None, "v3.4.0"));

        let same = json!({"core": {"version": "v3.4.0"}});
        assert!(!version_mismatch(same.as_object(), "v3.4.0"));

        let older = json!({"core": {"version": "v3.3.2"}});
        assert!(version_mismatch(older.as_object(), "v3.4.0"));

        let unversioned = json!({"core": {"status": "enabled"}});
        assert!(version_mismatch(unversioned.as_object(), "v3.4.0"));
    }

    #[test]
    fn stale_version_alone_requires_upgrade() {
        let d = doc(json!({"alerting": {}}), Some(json!({"core": {"version": "v3.3.0"}})));
        let p = plan(&d, "v3.4.0");
        assert!(p.fired.is_empty());
        assert!(p.upgrade_required());
        assert_eq!(p.spec, d.spec);
    }

    #[test]
    fn stock_current_document_needs_no_upgrade() {
        let d = doc(
            json!({
                "common": {"es": {
                    "logMaxAge": 7,
                    "elkPrefix": "logstash",
                    "basicAuth": {"enabled": false}
                }},
                "alerting": {"enabled": true}
            }),
            Some(json!({"clusterId": "c-1", "core": {"version": "v3.4.0"}})),
        );
        let p = plan(&d, "v3.4.0");
        assert!(p.fired.is_empty(), "fired {:?}", p.fired);
        assert!(!p.upgrade_required());
        assert_eq!(p.spec, d.spec);
    }

    #[test]
    fn rebuild_keeps_only_cluster_id() {
        let d = doc(
            json!({"notification": {}}),
            Some(json!({"clusterId": "c-1", "core": {"version": "v3.0.0"}, "redis": {}})),
        );
        let p = plan(&d, "v3.4.0");
        let next = rebuild(&d, p, "v3.4.0");

        assert_eq!(next.status, json!({"clusterId": "c-1"}).as_object().cloned());
        assert!(next.spec.is_empty());
        assert_eq!(next.metadata.labels.get("version").unwrap(), "v3.4.0");
    }

    #[test]
    fn rebuild_without_cluster_id_drops_status() {
        let d = doc(json!({"notification": {}}), Some(json!({"core": {}})));
        let next = rebuild(&d, plan(&d, "v3.4.0"), "v3.4.0");
        assert!(next.status.is_none());
    }

    #[test]
    fn rebuilt_document_is_a_fixed_point() {
        let d = doc(
            json!({"console": {"port": 30880}, "networkpolicy": {"enabled": false}}),
            Some(json!({"clusterId": "c-1", "core": {"version": "v3.0.0"}})),
        );
        let first = rebuild(&d, plan(&d, "v3.4.0"), "v3.4.0");

        let second = plan(&first, "v3.4.0");
        assert!(!second.upgrade_required());
        assert_eq!(second.spec, first.spec);
    }
}
