use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{trace, warn};

use kinst_core::{Launcher, TaskHandle, spawn_unit};
use kinst_model::{EXIT_SPAWN_FAILED, ExitCode, Ident, UnitOfWork};

type UnitFuture = Pin<Box<dyn Future<Output = ExitCode> + Send>>;
type UnitFn = Arc<dyn Fn(UnitOfWork) -> UnitFuture + Send + Sync>;

/// Launcher for pre-registered async functions, looked up by unit identity.
///
/// A unit whose identity has no registered function finishes with [`EXIT_SPAWN_FAILED`].
pub struct FnLauncher {
    name: &'static str,
    registry: Arc<RwLock<HashMap<Ident, UnitFn>>>,
}

impl FnLauncher {
    pub fn new() -> Self {
        Self::with_name("fn")
    }

    pub fn with_name(name: &'static str) -> Self {
        Self {
            name,
            registry: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register the function run for units named `ident`. Replaces a previous registration.
    pub fn register<F, Fut>(&self, ident: impl Into<Ident>, f: F) -> &Self
    where
        F: Fn(UnitOfWork) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ExitCode> + Send + 'static,
    {
        let ident = ident.into();
        let f: UnitFn = Arc::new(move |unit| Box::pin(f(unit)));
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        registry.insert(ident.clone(), f);
        trace!(target: "kinst.exec.fn", %ident, "function registered");
        self
    }

    fn lookup(&self, ident: &str) -> Option<UnitFn> {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry.get(ident).cloned()
    }
}

impl Default for FnLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl Launcher for FnLauncher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn launch(&self, unit: &UnitOfWork) -> TaskHandle {
        match self.lookup(&unit.ident) {
            Some(f) => spawn_unit(unit.ident.clone(), f(unit.clone())),
            None => {
                warn!(target: "kinst.exec.fn", ident = %unit.ident, "no function registered");
                spawn_unit(unit.ident.clone(), async { EXIT_SPAWN_FAILED })
            }
        }
    }
}
