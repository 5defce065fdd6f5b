use serde_json::{Value, json};

use kinst_model::Mapping;

use super::ensure_object;

const DEFAULT_MASTER_SIZE: &str = "4Gi";
const DEFAULT_DATA_SIZE: &str = "20Gi";

const MOVES: [(&str, &str, &str); 4] = [
    ("elasticsearchMasterReplicas", "master", "replicas"),
    ("elasticsearchDataReplicas", "data", "replicas"),
    ("elasticsearchMasterVolumeSize", "master", "volumeSize"),
    ("elasticsearchDataVolumeSize", "data", "volumeSize"),
];

const LEGACY_URL: &str = "externalElasticsearchUrl";

/// `common.es` flat replica/size fields move under `master` and `data`;
/// `externalElasticsearchUrl` is renamed to `externalElasticsearchHost`.
///
/// Only a block carrying one of those legacy fields is touched. The `master`/`data`
/// defaults are filled in as part of that rewrite, never on their own.
pub(super) fn migrate(spec: &mut Mapping, _status: Option<&Mapping>) -> bool {
    let Some(es) = spec
        .get_mut("common")
        .and_then(|c| c.get_mut("es"))
        .and_then(Value::as_object_mut)
    else {
        return false;
    };
    let legacy = MOVES.iter().any(|(field, _, _)| es.contains_key(*field))
        || es.contains_key(LEGACY_URL);
    if !legacy {
        return false;
    }

    for (role, size) in [("master", DEFAULT_MASTER_SIZE), ("data", DEFAULT_DATA_SIZE)] {
        if !es.get(role).is_some_and(Value::is_object) {
            es.insert(role.into(), json!({ "volumeSize": size }));
        }
    }

    for (field, role, key) in MOVES {
        let Some(value) = es.remove(field) else {
            continue;
        };
        if let Some(target) = ensure_object(es, role) {
            target.insert(key.into(), value);
        }
    }

    if let Some(url) = es.remove(LEGACY_URL) {
        if !es.contains_key("externalElasticsearchHost") {
            es.insert("externalElasticsearchHost".into(), url);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(value: Value) -> Mapping {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn current_block_without_roles_is_not_legacy() {
        let stock = json!({"common": {"es": {
            "logMaxAge": 7,
            "elkPrefix": "logstash",
            "basicAuth": {"enabled": false}
        }}});
        let mut s = spec(stock.clone());
        assert!(!migrate(&mut s, None));
        assert_eq!(Value::Object(s), stock);
    }

    #[test]
    fn legacy_url_alone_brings_role_defaults() {
        let mut s = spec(json!({"common": {"es": {"logMaxAge": 7, "externalElasticsearchUrl": "es.local"}}}));
        assert!(migrate(&mut s, None));
        assert_eq!(
            s["common"]["es"],
            json!({
                "logMaxAge": 7,
                "externalElasticsearchHost": "es.local",
                "master": {"volumeSize": "4Gi"},
                "data": {"volumeSize": "20Gi"}
            })
        );
    }

    #[test]
    fn existing_host_wins_over_legacy_url() {
        let mut s = spec(json!({"common": {"es": {
            "master": {}, "data": {},
            "externalElasticsearchUrl": "old",
            "externalElasticsearchHost": "new"
        }}}));
        assert!(migrate(&mut s, None));
        assert_eq!(s["common"]["es"]["externalElasticsearchHost"], json!("new"));
        assert!(s["common"]["es"].get("externalElasticsearchUrl").is_none());
    }

    #[test]
    fn no_es_no_change() {
        let mut s = spec(json!({"common": {}}));
        assert!(!migrate(&mut s, None));
    }
}
