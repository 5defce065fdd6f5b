use kinst_model::Mapping;

use super::ensure_object;

/// Top-level `console` moves to `common.core.console`.
pub(super) fn migrate(spec: &mut Mapping, _status: Option<&Mapping>) -> bool {
    let Some(console) = spec.remove("console") else {
        return false;
    };
    if let Some(core) = ensure_object(spec, "common").and_then(|c| ensure_object(c, "core")) {
        core.insert("console".into(), console);
    }
    true
}
