use serde_json::json;

use kinst_model::Mapping;

use super::enabled_flag;

/// Top-level `networkpolicy` becomes the `network` block with ippool and topology turned off.
pub(super) fn migrate(spec: &mut Mapping, _status: Option<&Mapping>) -> bool {
    let Some(policy) = spec.remove("networkpolicy") else {
        return false;
    };
    let enabled = enabled_flag(&policy);

    spec.insert(
        "network".into(),
        json!({
            "networkpolicy": {"enabled": enabled},
            "ippool": {"type": "none"},
            "topology": {"type": "none"}
        }),
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_network_block() {
        let mut s = json!({"networkpolicy": {"enabled": true}, "network": {"stale": 1}})
            .as_object()
            .cloned()
            .unwrap();
        assert!(migrate(&mut s, None));
        assert!(s.get("networkpolicy").is_none());
        assert_eq!(
            s["network"],
            json!({
                "networkpolicy": {"enabled": true},
                "ippool": {"type": "none"},
                "topology": {"type": "none"}
            })
        );
    }
}
