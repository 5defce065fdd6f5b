use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Enabled and disabled component names derived from the raw configuration.
///
/// `enabled` keeps insertion order (baseline first, then configured entries) and never holds duplicates.
/// The two sets are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSelection {
    enabled: Vec<String>,
    disabled: BTreeSet<String>,
}

impl ComponentSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` to the enabled list unless it is already there or explicitly disabled.
    pub fn enable(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.disabled.contains(&name) || self.enabled.contains(&name) {
            return;
        }
        self.enabled.push(name);
    }

    /// Mark `name` disabled; an explicit disable always wins over an earlier enable.
    pub fn disable(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.enabled.retain(|n| *n != name);
        self.disabled.insert(name);
    }

    /// Drop `name` from the enabled list if present. Does not mark it disabled.
    pub fn exclude(&mut self, name: &str) {
        self.enabled.retain(|n| n != name);
    }

    pub fn enabled(&self) -> &[String] {
        &self.enabled
    }

    pub fn disabled(&self) -> &BTreeSet<String> {
        &self.disabled
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.iter().any(|n| n == name)
    }

    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.contains(name)
    }
}
