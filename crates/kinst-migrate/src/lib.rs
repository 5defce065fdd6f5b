//! Schema migration of the persisted cluster configuration.
//!
//! The migrator rewrites legacy shapes in `spec` through a fixed chain of rules.
//! Each rule only acts on the legacy fields it detects and removes them, so the chain is idempotent.
//! When any rule fires, or the recorded core version differs from this installer's version,
//! the stored document is replaced and the caller is expected to end the run.
mod error;
pub use error::MigrateError;

pub mod rules;
pub use rules::{CHAIN, MigrationRule, apply_chain};

mod plan;
pub use plan::{MigrationPlan, plan, rebuild, version_mismatch};

mod migrator;
pub use migrator::{MigrationOutcome, Migrator};
