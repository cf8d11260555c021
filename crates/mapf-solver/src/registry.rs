//! Strategy registry — string-keyed solver construction.

use std::collections::BTreeMap;
use std::sync::Arc;

use mapf_core::PlannerConfig;
use mapf_instance::Instance;

use crate::error::{SolverError, SolverResult};
use crate::pibt::PibtSolver;
use crate::solver::Solver;

/// Constructs one solver for one instance under one configuration.
pub type SolverFactory = fn(Arc<Instance>, &PlannerConfig) -> Box<dyn Solver>;

/// Maps strategy names to factories.
///
/// `Default` registers the built-in strategies; applications extend the set
/// with [`register`](Self::register).  The registry is a plain value — no
/// global state — so tests and embedders can hold independent registries.
pub struct SolverRegistry {
    factories: BTreeMap<&'static str, SolverFactory>,
}

impl SolverRegistry {
    /// An empty registry with no strategies at all.
    pub fn empty() -> Self {
        SolverRegistry { factories: BTreeMap::new() }
    }

    /// Add (or replace) a strategy under `name`.
    pub fn register(&mut self, name: &'static str, factory: SolverFactory) {
        self.factories.insert(name, factory);
    }

    /// Registered strategy names, sorted.
    pub fn strategies(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Construct the solver named by `config.strategy`.
    pub fn make(
        &self,
        instance: Arc<Instance>,
        config:   &PlannerConfig,
    ) -> SolverResult<Box<dyn Solver>> {
        match self.factories.get(config.strategy.as_str()) {
            Some(factory) => Ok(factory(instance, config)),
            None => Err(SolverError::UnknownStrategy(config.strategy.clone())),
        }
    }
}

impl Default for SolverRegistry {
    fn default() -> Self {
        let mut registry = SolverRegistry::empty();
        registry.register(PibtSolver::NAME, |instance, config| {
            Box::new(PibtSolver::new(instance, config))
        });
        registry
    }
}

/// Construct a solver from the default registry.
///
/// Fails with [`SolverError::UnknownStrategy`] when `config.strategy` names
/// nothing registered.
pub fn make_solver(
    instance: Arc<Instance>,
    config:   &PlannerConfig,
) -> SolverResult<Box<dyn Solver>> {
    SolverRegistry::default().make(instance, config)
}
