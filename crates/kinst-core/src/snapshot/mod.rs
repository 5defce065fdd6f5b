//! Local JSON snapshots of the configuration document, consumed by the install procedures.
//!
//! A snapshot file is never left absent: when the full snapshot cannot be written a minimal
//! placeholder is written instead.
use std::{fs, io, path::Path};

use serde::Serialize;
use serde_json::{Serializer, Value, json, ser::PrettyFormatter};
use tracing::{debug, warn};

use kinst_model::Mapping;

use crate::error::CoreError;

/// Which content ended up in a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    Full,
    Placeholder,
}

/// Write `spec` plus the synthesized `nodeNum` and `kubernetes_version` fields.
pub fn write_config_snapshot(
    path: &Path,
    spec: &Mapping,
    node_num: usize,
    kubernetes_version: &str,
) -> Result<SnapshotKind, CoreError> {
    let mut config = spec.clone();
    config.insert("nodeNum".to_string(), json!(node_num));
    config.insert("kubernetes_version".to_string(), json!(kubernetes_version));

    write_or_placeholder(path, Some(Value::Object(config)), json!({"config": "new"}))
}

/// Write `{"status": <status>}`; a missing status falls back to the placeholder.
pub fn write_status_snapshot(
    path: &Path,
    status: Option<&Mapping>,
) -> Result<SnapshotKind, CoreError> {
    let full = status.map(|s| json!({ "status": s }));
    write_or_placeholder(path, full, json!({"status": {"enabledComponents": []}}))
}

fn write_or_placeholder(
    path: &Path,
    full: Option<Value>,
    placeholder: Value,
) -> Result<SnapshotKind, CoreError> {
    if let Some(full) = full {
        match write_json(path, &full) {
            Ok(()) => {
                debug!(target: "kinst.core.snapshot", path = %path.display(), "snapshot written");
                return Ok(SnapshotKind::Full);
            }
            Err(e) => {
                warn!(target: "kinst.core.snapshot", path = %path.display(), error = %e, "writing placeholder snapshot");
            }
        }
    }
    write_json(path, &placeholder).map_err(|e| CoreError::io(path, e))?;
    Ok(SnapshotKind::Placeholder)
}

/// Pretty JSON with four-space indentation.
fn write_json(path: &Path, value: &Value) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser).map_err(io::Error::other)?;
    fs::write(path, buf)
}
