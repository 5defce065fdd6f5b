use serde_json::json;

use kinst_model::Mapping;

use super::enabled_flag;

/// Flat `openpitrix.enabled` moves to `openpitrix.store.enabled`.
pub(super) fn migrate(spec: &mut Mapping, _status: Option<&Mapping>) -> bool {
    let Some(openpitrix) = spec
        .get("openpitrix")
        .filter(|o| o.is_object() && o.get("store").is_none())
    else {
        return false;
    };
    let enabled = enabled_flag(openpitrix);

    spec.insert("openpitrix".into(), json!({"store": {"enabled": enabled}}));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn wraps_flat_flag() {
        let mut s = json!({"openpitrix": {"enabled": true}}).as_object().cloned().unwrap();
        assert!(migrate(&mut s, None));
        assert_eq!(
            Value::Object(s),
            json!({"openpitrix": {"store": {"enabled": true}}})
        );
    }

    #[test]
    fn store_shape_untouched() {
        let mut s = json!({"openpitrix": {"store": {"enabled": false}}})
            .as_object()
            .cloned()
            .unwrap();
        assert!(!migrate(&mut s, None));
    }
}
