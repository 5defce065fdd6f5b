use serde_json::json;

use kinst_model::Mapping;

use super::enabled_flag;

/// `logging.logsidecarReplicas` becomes a `logsidecar` sub-object with a fixed replica count.
pub(super) fn migrate(spec: &mut Mapping, _status: Option<&Mapping>) -> bool {
    let Some(logging) = spec.get("logging").filter(|l| l.get("logsidecarReplicas").is_some()) else {
        return false;
    };
    let enabled = enabled_flag(logging);

    spec.insert(
        "logging".into(),
        json!({
            "enabled": enabled,
            "logsidecar": {"enabled": enabled, "replicas": 2}
        }),
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn missing_enabled_means_disabled() {
        let mut s = json!({"logging": {"logsidecarReplicas": 5}})
            .as_object()
            .cloned()
            .unwrap();
        assert!(migrate(&mut s, None));
        assert_eq!(
            s["logging"],
            json!({"enabled": false, "logsidecar": {"enabled": false, "replicas": 2}})
        );
    }

    #[test]
    fn current_logging_untouched() {
        let mut s = json!({"logging": {"enabled": true}}).as_object().cloned().unwrap();
        assert!(!migrate(&mut s, None));
        assert_eq!(Value::Object(s), json!({"logging": {"enabled": true}}));
    }
}
