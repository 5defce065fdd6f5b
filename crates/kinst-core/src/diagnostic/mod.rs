//! Failure diagnostics read back from a unit's event log.
//!
//! The install procedure writes one JSON record per event into `job_events/`, named
//! `<N>-<suffix>` where `N` orders the events. The last record is always a run summary,
//! so the actionable failure is the one before it.
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use kinst_model::{Ident, UnitOfWork};

#[derive(Error, Debug)]
pub enum DiagnosticError {
    #[error("event directory {} does not exist", .0.display())]
    NoEventDir(PathBuf),

    #[error("{found} event file(s) found, at least 2 required")]
    TooFewEvents { found: usize },

    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("event file {} is not valid json: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Decoded failure record of a unit, returned verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureEvent {
    pub unit: Ident,
    pub path: PathBuf,
    pub record: Value,
}

/// Locate and decode the failure record of `unit`.
pub fn extract(unit: &UnitOfWork) -> Result<FailureEvent, DiagnosticError> {
    let (path, record) = extract_from(&unit.events_dir())?;
    Ok(FailureEvent {
        unit: unit.ident.clone(),
        path,
        record,
    })
}

/// Locate and decode the failure record inside `events_dir`.
pub fn extract_from(events_dir: &Path) -> Result<(PathBuf, Value), DiagnosticError> {
    if !events_dir.is_dir() {
        return Err(DiagnosticError::NoEventDir(events_dir.to_path_buf()));
    }

    let events = sorted_events(events_dir)?;
    let path = select_failure_event(&events)
        .ok_or(DiagnosticError::TooFewEvents {
            found: events.len(),
        })?
        .to_path_buf();
    trace!(target: "kinst.core.diagnostic", path = %path.display(), "failure event selected");

    let raw = fs::read_to_string(&path).map_err(|source| DiagnosticError::Io {
        path: path.clone(),
        source,
    })?;
    let record = serde_json::from_str(&raw).map_err(|source| DiagnosticError::Decode {
        path: path.clone(),
        source,
    })?;
    Ok((path, record))
}

/// Pick the actionable record from events sorted by ordinal: the second-to-last one.
pub fn select_failure_event(sorted: &[PathBuf]) -> Option<&Path> {
    let idx = sorted.len().checked_sub(2)?;
    sorted.get(idx).map(PathBuf::as_path)
}

/// Numeric prefix of an event file name (`"12-abc.json"` -> `12`).
fn event_ordinal(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    let (prefix, _) = name.split_once('-')?;
    prefix.parse().ok()
}

/// Event files ordered by ordinal. Entries without a numeric prefix are skipped.
fn sorted_events(dir: &Path) -> Result<Vec<PathBuf>, DiagnosticError> {
    let entries = fs::read_dir(dir).map_err(|source| DiagnosticError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut events: Vec<(u64, PathBuf)> = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| DiagnosticError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if !path.is_file() {
            continue;
        }
        if let Some(ordinal) = event_ordinal(&path) {
            events.push((ordinal, path));
        }
    }

    events.sort_by_key(|(ordinal, _)| *ordinal);
    Ok(events.into_iter().map(|(_, p)| p).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_event(dir: &Path, name: &str, body: Value) {
        fs::write(dir.join(name), body.to_string()).unwrap();
    }

    fn events_dir() -> (tempfile::TempDir, PathBuf) {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("logging/logging/job_events");
        fs::create_dir_all(&dir).unwrap();
        (root, dir)
    }

    #[test]
    fn missing_event_dir_yields_no_diagnostic() {
        let root = tempfile::tempdir().unwrap();
        let err = extract_from(&root.path().join("nope")).unwrap_err();
        assert!(matches!(err, DiagnosticError::NoEventDir(_)));
    }

    #[test]
    fn empty_event_dir_yields_no_diagnostic() {
        let (_root, dir) = events_dir();
        let err = extract_from(&dir).unwrap_err();
        assert!(matches!(err, DiagnosticError::TooFewEvents { found: 0 }));
    }

    #[test]
    fn single_event_yields_no_diagnostic() {
        let (_root, dir) = events_dir();
        write_event(&dir, "1-aaa.json", json!({"event": "playbook_on_stats"}));

        let err = extract_from(&dir).unwrap_err();
        assert!(matches!(err, DiagnosticError::TooFewEvents { found: 1 }));
    }

    #[test]
    fn picks_second_to_last_of_three() {
        let (_root, dir) = events_dir();
        write_event(&dir, "1-aaa.json", json!({"event": "playbook_on_start"}));
        write_event(&dir, "2-bbb.json", json!({"event": "runner_on_failed", "task": "x"}));
        write_event(&dir, "3-ccc.json", json!({"event": "playbook_on_stats"}));

        let (path, record) = extract_from(&dir).unwrap();
        assert!(path.ends_with("2-bbb.json"));
        assert_eq!(record["event"], "runner_on_failed");
    }

    #[test]
    fn ordering_is_numeric_not_lexicographic() {
        let (_root, dir) = events_dir();
        write_event(&dir, "2-a.json", json!({"n": 2}));
        write_event(&dir, "10-b.json", json!({"n": 10}));
        write_event(&dir, "11-c.json", json!({"n": 11}));
        write_event(&dir, "partial.json", json!({"n": -1}));

        let (_, record) = extract_from(&dir).unwrap();
        assert_eq!(record["n"], 10);
    }

    #[test]
    fn undecodable_event_is_reported() {
        let (_root, dir) = events_dir();
        fs::write(dir.join("1-a.json"), "not json").unwrap();
        write_event(&dir, "2-b.json", json!({}));

        let err = extract_from(&dir).unwrap_err();
        assert!(matches!(err, DiagnosticError::Decode { .. }));
    }

    #[test]
    fn extract_uses_unit_layout() {
        let root = tempfile::tempdir().unwrap();
        let unit = UnitOfWork::new(
            "logging",
            "logging.yaml",
            root.path(),
            root.path().join("logging"),
        );
        fs::create_dir_all(unit.events_dir()).unwrap();
        write_event(&unit.events_dir(), "1-a.json", json!({"failed": true}));
        write_event(&unit.events_dir(), "2-b.json", json!({"stats": {}}));

        let event = extract(&unit).unwrap();
        assert_eq!(event.unit, "logging");
        assert_eq!(event.record, json!({"failed": true}));
    }

    #[test]
    fn selector_on_short_lists() {
        assert!(select_failure_event(&[]).is_none());
        assert!(select_failure_event(&[PathBuf::from("1-a")]).is_none());
        assert_eq!(
            select_failure_event(&[PathBuf::from("1-a"), PathBuf::from("2-b")]),
            Some(Path::new("1-a"))
        );
    }
}
