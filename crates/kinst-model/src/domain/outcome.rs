use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ExitCode, Ident, TaskStatus};

/// Terminal result of a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOutcome {
    pub exit_code: ExitCode,
    pub status: TaskStatus,
}

impl UnitOutcome {
    pub fn from_exit_code(exit_code: ExitCode) -> Self {
        Self {
            exit_code,
            status: TaskStatus::from_exit_code(exit_code),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.exit_code != 0
    }
}

/// Outcomes of a batch keyed by unit identity.
///
/// Recording is idempotent: the first outcome recorded for an identity wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunResult {
    outcomes: BTreeMap<Ident, UnitOutcome>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a terminal outcome; returns `false` if `ident` was already recorded.
    pub fn record(&mut self, ident: impl Into<Ident>, outcome: UnitOutcome) -> bool {
        let ident = ident.into();
        if self.outcomes.contains_key(&ident) {
            return false;
        }
        self.outcomes.insert(ident, outcome);
        true
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, ident: &str) -> Option<&UnitOutcome> {
        self.outcomes.get(ident)
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.outcomes.contains_key(ident)
    }

    /// `true` iff any recorded exit code is non-zero.
    pub fn overall_failed(&self) -> bool {
        self.outcomes.values().any(UnitOutcome::is_failure)
    }

    /// Identities and outcomes of failed units, in identity order.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &UnitOutcome)> {
        self.iter().filter(|(_, o)| o.is_failure())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UnitOutcome)> {
        self.outcomes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn idents(&self) -> impl Iterator<Item = &str> {
        self.outcomes.keys().map(String::as_str)
    }
}
