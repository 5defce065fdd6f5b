use serde_json::{Value, json};

use kinst_model::Mapping;

use super::ensure_object;

// `redisVolumSize` is spelled as the legacy schema spelled it.
const LEGACY_FIELDS: [&str; 5] = [
    "mysqlVolumeSize",
    "etcdVolumeSize",
    "redisVolumSize",
    "openldapVolumeSize",
    "minioVolumeSize",
];

/// Flat `common.*VolumeSize` fields become per-service sub-objects.
///
/// `redis` and `openldap` get an explicit `enabled` taken from `status.<svc>.status`.
/// The mysql and etcd sizes no longer exist and are dropped.
pub(super) fn migrate(spec: &mut Mapping, status: Option<&Mapping>) -> bool {
    let Some(common) = spec.get_mut("common").and_then(Value::as_object_mut) else {
        return false;
    };
    if !LEGACY_FIELDS.iter().any(|f| common.contains_key(*f)) {
        return false;
    }

    common.remove("mysqlVolumeSize");
    common.remove("etcdVolumeSize");

    for (service, legacy) in [("redis", "redisVolumSize"), ("openldap", "openldapVolumeSize")] {
        let size = common.remove(legacy);
        let mut sub = Mapping::new();
        sub.insert("enabled".into(), json!(service_enabled(status, service)));
        if let Some(size) = size {
            sub.insert("volumeSize".into(), size);
        }
        common.insert(service.into(), Value::Object(sub));
    }

    if let Some(size) = common.remove("minioVolumeSize") {
        if let Some(minio) = ensure_object(common, "minio") {
            minio.insert("volumeSize".into(), size);
        }
    }
    true
}

fn service_enabled(status: Option<&Mapping>, service: &str) -> bool {
    status
        .and_then(|s| s.get(service))
        .and_then(|svc| svc.get("status"))
        .and_then(Value::as_str)
        == Some("enabled")
}
