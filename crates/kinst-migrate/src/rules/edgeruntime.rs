use serde_json::{Value, json};

use kinst_model::Mapping;

/// Top-level `kubeedge` is nested under `edgeruntime`.
///
/// `edgeWatcher` is dropped and an external `iptables-manager` is added.
/// A `kubeedge` block without `enabled` is removed without replacement.
pub(super) fn migrate(spec: &mut Mapping, _status: Option<&Mapping>) -> bool {
    let Some(kubeedge) = spec.remove("kubeedge") else {
        return false;
    };
    let Value::Object(mut kubeedge) = kubeedge else {
        return true;
    };
    let Some(enabled) = kubeedge.get("enabled").cloned() else {
        return true;
    };

    kubeedge.remove("edgeWatcher");
    kubeedge.insert(
        "iptables-manager".into(),
        json!({"enabled": true, "mode": "external"}),
    );
    spec.insert(
        "edgeruntime".into(),
        json!({"enabled": enabled, "kubeedge": kubeedge}),
    );
    true
}
