//! Derives the enabled/disabled component lists from the configuration snapshot.
use std::{fs, path::Path};

use serde_json::Value;
use tracing::debug;

use kinst_model::{BASELINE_COMPONENTS, ComponentSelection, EXCLUDED_COMPONENTS, Mapping};

use crate::error::CoreError;

/// Resolve the component selection from a raw configuration mapping.
///
/// Baseline components are enabled first, then every top-level entry carrying a boolean
/// `enabled` field is applied in mapping order. An explicit `enabled: false` removes a
/// baseline component. Excluded components are dropped from `enabled` last.
pub fn resolve(raw: &Mapping) -> ComponentSelection {
    let mut selection = ComponentSelection::new();
    for name in BASELINE_COMPONENTS {
        selection.enable(name);
    }

    for (name, params) in raw {
        let flag = params
            .as_object()
            .and_then(|p| p.get("enabled"))
            .and_then(Value::as_bool);
        match flag {
            Some(true) => selection.enable(name.as_str()),
            Some(false) => selection.disable(name.as_str()),
            None => {}
        }
    }

    for name in EXCLUDED_COMPONENTS {
        selection.exclude(name);
    }
    selection
}

/// Read the configuration snapshot at `path` and resolve it.
pub fn resolve_file(path: &Path) -> Result<ComponentSelection, CoreError> {
    if !path.exists() {
        return Err(CoreError::ConfigMissing(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
    let config: Mapping = serde_json::from_str(&raw).map_err(|source| CoreError::ConfigDecode {
        path: path.to_path_buf(),
        source,
    })?;

    let selection = resolve(&config);
    debug!(
        target: "kinst.core.selection",
        enabled = ?selection.enabled(),
        disabled = ?selection.disabled(),
        "components resolved"
    );
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn mapping(v: Value) -> Mapping {
        v.as_object().cloned().unwrap()
    }

    fn enabled_set(sel: &ComponentSelection) -> BTreeSet<&str> {
        sel.enabled().iter().map(String::as_str).collect()
    }

    #[test]
    fn baseline_always_present_for_empty_config() {
        let sel = resolve(&Mapping::new());
        assert_eq!(
            enabled_set(&sel),
            BTreeSet::from(["monitoring", "multicluster", "openpitrix", "network"])
        );
        assert!(sel.disabled().is_empty());
    }

    #[test]
    fn excluded_names_never_enabled() {
        let sel = resolve(&mapping(json!({
            "metrics_server": {"enabled": true},
            "networkpolicy": {"enabled": true},
            "telemetry": {"enabled": true},
            "logging": {"enabled": true}
        })));

        for name in EXCLUDED_COMPONENTS {
            assert!(!sel.is_enabled(name), "{name} must not be enabled");
        }
        assert!(sel.is_enabled("logging"));
        for name in BASELINE_COMPONENTS {
            assert!(sel.is_enabled(name));
        }
    }

    #[test]
    fn enabled_and_disabled_follow_flags() {
        let sel = resolve(&mapping(json!({
            "devops": {"enabled": true, "jenkinsMemoryLim": "2Gi"},
            "logging": {"enabled": false},
            "events": {"enabled": true}
        })));

        assert!(sel.is_enabled("devops"));
        assert!(sel.is_enabled("events"));
        assert!(sel.is_disabled("logging"));
        assert!(!sel.is_enabled("logging"));
    }

    #[test]
    fn explicit_disable_beats_baseline() {
        let sel = resolve(&mapping(json!({
            "monitoring": {"enabled": false},
            "alerting": {"enabled": true}
        })));

        assert_eq!(
            enabled_set(&sel),
            BTreeSet::from(["multicluster", "openpitrix", "network", "alerting"])
        );
        assert_eq!(sel.disabled(), &BTreeSet::from(["monitoring".to_string()]));
    }

    #[test]
    fn non_mapping_and_flagless_entries_are_ignored() {
        let sel = resolve(&mapping(json!({
            "nodeNum": 3,
            "kubernetes_version": "v1.19.8",
            "persistence": {"storageClass": ""},
            "auditing": {"enabled": "yes"},
            "etcd": ["a", "b"]
        })));

        assert_eq!(sel.enabled().len(), BASELINE_COMPONENTS.len());
        assert!(sel.disabled().is_empty());
    }

    #[test]
    fn baseline_enabled_twice_is_listed_once() {
        let sel = resolve(&mapping(json!({"monitoring": {"enabled": true}})));
        let count = sel.enabled().iter().filter(|n| *n == "monitoring").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn missing_file_is_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_file(&dir.path().join("ks-config.json")).unwrap_err();
        assert!(matches!(err, CoreError::ConfigMissing(_)));
    }

    #[test]
    fn reads_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ks-config.json");
        fs::write(&path, r#"{"alerting": {"enabled": true}, "nodeNum": 1}"#).unwrap();

        let sel = resolve_file(&path).unwrap();
        assert!(sel.is_enabled("alerting"));
    }

    #[test]
    fn non_object_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ks-config.json");
        fs::write(&path, "[1, 2]").unwrap();

        let err = resolve_file(&path).unwrap_err();
        assert!(matches!(err, CoreError::ConfigDecode { .. }));
    }
}
