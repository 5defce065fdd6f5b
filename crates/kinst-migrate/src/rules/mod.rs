//! Ordered chain of legacy-shape rewrites applied to `spec`.
//!
//! A rule receives the mutable `spec` and the read-only `status` of the stored
//! document and returns `true` when it detected and rewrote a legacy shape.
use serde_json::{Value, json};

use kinst_model::Mapping;

mod common;
mod console;
mod edgeruntime;
mod elasticsearch;
mod logging;
mod network;
mod notification;
mod openpitrix;

type RuleFn = fn(&mut Mapping, Option<&Mapping>) -> bool;

/// One named step of the migration chain.
#[derive(Clone, Copy)]
pub struct MigrationRule {
    name: &'static str,
    apply: RuleFn,
}

impl MigrationRule {
    const fn new(name: &'static str, apply: RuleFn) -> Self {
        Self { name, apply }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Rewrite `spec` in place; `true` if this rule fired.
    pub fn apply(&self, spec: &mut Mapping, status: Option<&Mapping>) -> bool {
        (self.apply)(spec, status)
    }
}

impl std::fmt::Debug for MigrationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MigrationRule").field(&self.name).finish()
    }
}

/// Rules in application order.
pub const CHAIN: [MigrationRule; 8] = [
    MigrationRule::new("common", common::migrate),
    MigrationRule::new("common.es", elasticsearch::migrate),
    MigrationRule::new("console", console::migrate),
    MigrationRule::new("logging", logging::migrate),
    MigrationRule::new("notification", notification::migrate),
    MigrationRule::new("openpitrix", openpitrix::migrate),
    MigrationRule::new("networkpolicy", network::migrate),
    MigrationRule::new("kubeedge", edgeruntime::migrate),
];

/// Run the whole chain; returns the names of the rules that fired.
pub fn apply_chain(spec: &mut Mapping, status: Option<&Mapping>) -> Vec<&'static str> {
    CHAIN
        .iter()
        .filter_map(|rule| rule.apply(spec, status).then_some(rule.name()))
        .collect()
}

/// Object stored at `key`, replacing whatever non-object value sits there.
pub(crate) fn ensure_object<'a>(map: &'a mut Mapping, key: &str) -> Option<&'a mut Mapping> {
    let slot = map.entry(key).or_insert_with(|| json!({}));
    if !slot.is_object() {
        *slot = json!({});
    }
    slot.as_object_mut()
}

/// `value.enabled` as a boolean; absent or non-boolean counts as `false`.
pub(crate) fn enabled_flag(value: &Value) -> bool {
    value.get("enabled").and_then(Value::as_bool).unwrap_or(false)
}
